//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and startup produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (redirect and cacheable-response counters)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
