//! Hashed dataset URLs for serving immutable datasets behind a caching proxy.
//!
//! Every dataset with a content hash is exposed under `/{name}-{token}`,
//! where `token` is the first 7 characters of the hash. Requests that omit
//! or mismatch the token are redirected to the canonical path; responses on
//! the canonical path get `cache-control: max-age=N, public` so a CDN can
//! keep them indefinitely. The URL changes whenever the content does.
//!
//! ```text
//! startup:  DatasetCatalog → Registrar → HashRegistry (immutable, Arc)
//! request:  hashed_urls middleware → upstream forwarder → response
//! ```

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registrar;
pub mod registry;
pub mod routing;

pub use catalog::{Dataset, DatasetCatalog};
pub use config::HashedUrlsConfig;
pub use http::{CachePolicy, HashedUrls, HttpServer};
pub use lifecycle::Shutdown;
pub use registrar::{Registrar, RegistrationError};
pub use registry::HashRegistry;
