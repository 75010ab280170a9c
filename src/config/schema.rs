//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::http::response::{CachePolicy, DEFAULT_MAX_AGE};
use crate::registry::DEFAULT_DELIMITER;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HashedUrlsConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream dataset server requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Hashed URL behaviour.
    pub hashed_urls: HashedUrlsSettings,

    /// Add CORS headers to redirect responses.
    pub cors: bool,

    /// Enable the aggregate cross-dataset route.
    pub crossdb: bool,

    /// Name of the aggregate dataset.
    pub aggregate_name: String,

    /// Datasets served by the upstream.
    pub datasets: Vec<DatasetConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for HashedUrlsConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            timeouts: TimeoutConfig::default(),
            hashed_urls: HashedUrlsSettings::default(),
            cors: false,
            crossdb: false,
            aggregate_name: "_memory".to_string(),
            datasets: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL, e.g. "http://127.0.0.1:8001".
    pub url: String,

    /// Forward hashed routes to the upstream by plain dataset name.
    pub rewrite_routes: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8001".to_string(),
            rewrite_routes: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Settings for the hashed URL middleware.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HashedUrlsSettings {
    /// `max-age` for responses served from canonical paths, in seconds.
    pub max_age: u64,

    /// Also mark error responses (status >= 400) as cacheable.
    pub cache_on_errors: bool,

    /// Separator between dataset name and hash token.
    pub delimiter: char,
}

impl Default for HashedUrlsSettings {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            cache_on_errors: false,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl HashedUrlsSettings {
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_age: self.max_age,
            cache_on_errors: self.cache_on_errors,
        }
    }
}

/// A dataset definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Dataset name, used as the first path segment.
    pub name: String,

    /// Explicit content hash for an immutable dataset.
    #[serde(default)]
    pub hash: Option<String>,

    /// Backing file; hashed with SHA-256 when immutable and no hash is given.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Whether the dataset content never changes for the process lifetime.
    #[serde(default)]
    pub immutable: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: HashedUrlsConfig = toml::from_str("").unwrap();
        assert_eq!(config.hashed_urls.max_age, 31_536_000);
        assert!(!config.hashed_urls.cache_on_errors);
        assert_eq!(config.hashed_urls.delimiter, '-');
        assert_eq!(config.aggregate_name, "_memory");
        assert!(config.datasets.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: HashedUrlsConfig = toml::from_str(
            r#"
            cors = true
            crossdb = true

            [upstream]
            url = "http://127.0.0.1:9001"
            rewrite_routes = true

            [hashed_urls]
            max_age = 3600
            cache_on_errors = true
            delimiter = "_"

            [[datasets]]
            name = "docs"
            hash = "abcdef0123456789"
            immutable = true

            [[datasets]]
            name = "scratch"
            file = "scratch.db"
            "#,
        )
        .unwrap();

        assert!(config.cors && config.crossdb);
        assert_eq!(config.hashed_urls.cache_policy(), CachePolicy { max_age: 3600, cache_on_errors: true });
        assert_eq!(config.hashed_urls.delimiter, '_');
        assert_eq!(config.datasets.len(), 2);
        assert!(!config.datasets[1].immutable);
        assert_eq!(config.datasets[1].file.as_deref(), Some(std::path::Path::new("scratch.db")));
    }
}
