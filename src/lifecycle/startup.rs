//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the dataset catalog from configuration
//! - Run the registrar to assign hashed routes
//! - Hand the immutable registry and catalog to the HTTP layer
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Runs single-threaded before the listener is bound

use std::sync::Arc;

use crate::catalog::{CatalogError, DatasetCatalog};
use crate::config::HashedUrlsConfig;
use crate::http::upstream::UpstreamError;
use crate::registrar::{Registrar, RegistrationError};
use crate::registry::HashRegistry;

/// Fatal errors during startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Catalog with registered routes, plus the registry derived from it.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub catalog: DatasetCatalog,
    pub registry: Arc<HashRegistry>,
}

/// Build the catalog and register hashed routes.
pub fn prepare(config: &HashedUrlsConfig) -> Result<Prepared, StartupError> {
    let mut catalog = DatasetCatalog::from_config(&config.datasets)?;

    let mut registrar = Registrar::new(config.hashed_urls.delimiter);
    if config.crossdb {
        registrar = registrar.with_aggregate(&config.aggregate_name);
    }
    let registry = registrar.register(&mut catalog)?;

    tracing::info!(
        datasets = catalog.len(),
        hashed = registry.len(),
        "Dataset routes registered"
    );

    Ok(Prepared {
        catalog,
        registry: Arc::new(registry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;

    fn config() -> HashedUrlsConfig {
        HashedUrlsConfig {
            datasets: vec![
                DatasetConfig {
                    name: "docs".into(),
                    hash: Some("abcdef0123456789".into()),
                    file: None,
                    immutable: true,
                },
                DatasetConfig {
                    name: "notes".into(),
                    hash: None,
                    file: None,
                    immutable: false,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_registers_routes() {
        let prepared = prepare(&config()).unwrap();
        assert_eq!(prepared.registry.token("docs"), Some("abcdef0"));
        assert_eq!(prepared.catalog.get("docs").unwrap().route(), "docs-abcdef0");
        assert!(prepared.catalog.get("_memory").is_none());
    }

    #[test]
    fn test_prepare_with_crossdb() {
        let mut config = config();
        config.crossdb = true;
        let prepared = prepare(&config).unwrap();
        assert!(prepared.registry.contains("_memory"));
    }

    #[test]
    fn test_prepare_rejects_ambiguous_names() {
        let mut config = config();
        config.datasets[0].name = "my-docs".into();
        assert!(matches!(prepare(&config), Err(StartupError::Registration(_))));
    }
}
