//! Metrics exposition.
//!
//! # Metrics
//! - `hashed_urls_redirects_total` (counter): redirects to canonical paths, by dataset
//! - `hashed_urls_cacheable_responses_total` (counter): canonical responses
//!   given the far-future cache header, by dataset

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}
