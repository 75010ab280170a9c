//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a configured level, e.g. `hashed_urls=info,tower_http=info`.
pub fn default_filter(log_level: &str) -> String {
    format!("hashed_urls={0},tower_http={0}", log_level)
}

/// Install the global subscriber. Call once, from `main`.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
