//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HashedUrlsConfig (validated, immutable)
//!     → lifecycle::startup builds catalog + registry from it
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the hash registry derived from it is
//!   never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DatasetConfig, HashedUrlsConfig, HashedUrlsSettings, ListenerConfig, ObservabilityConfig,
    UpstreamConfig,
};
