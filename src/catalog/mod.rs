//! Host dataset catalog.
//!
//! # Data Flow
//! ```text
//! [[datasets]] config
//!     → hash.rs (explicit hash, or SHA-256 of an immutable file)
//!     → DatasetCatalog (insertion ordered)
//!     → registrar (rewrites routes of hashed datasets)
//! ```
//!
//! Iteration order is insertion order; the aggregate token depends on it.

pub mod dataset;
pub mod hash;

use std::path::PathBuf;

use crate::config::DatasetConfig;

pub use dataset::Dataset;

/// Errors raised while building the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate dataset name: {0}")]
    DuplicateName(String),

    #[error("failed to hash dataset {name} from {path}: {source}")]
    Hash {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered collection of the host's datasets.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    datasets: Vec<Dataset>,
}

impl DatasetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from configuration, hashing immutable files as needed.
    pub fn from_config(configs: &[DatasetConfig]) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for config in configs {
            let dataset = match (&config.hash, &config.file) {
                (Some(hash), _) if config.immutable => Dataset::immutable(&config.name, hash),
                (None, Some(path)) if config.immutable => {
                    let hash = hash::hash_file(path).map_err(|source| CatalogError::Hash {
                        name: config.name.clone(),
                        path: path.clone(),
                        source,
                    })?;
                    tracing::debug!(dataset = %config.name, path = ?path, "Hashed immutable dataset");
                    Dataset::immutable(&config.name, hash)
                }
                _ => Dataset::mutable(&config.name),
            };
            catalog.insert(dataset)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, dataset: Dataset) -> Result<(), CatalogError> {
        if self.get(dataset.name()).is_some() {
            return Err(CatalogError::DuplicateName(dataset.name().to_string()));
        }
        self.datasets.push(dataset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Dataset> {
        self.datasets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
