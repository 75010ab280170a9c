//! Startup pass that gives every hashed dataset a hash-bearing route.
//!
//! # Responsibilities
//! - Derive the 7-character token for each dataset with a content hash
//! - Rewrite `route` to `{name}{delimiter}{token}`
//! - Derive the aggregate token when cross-dataset querying is enabled
//! - Produce the immutable [`HashRegistry`] the middleware closes over
//!
//! # Design Decisions
//! - Names that would make routes ambiguous are rejected before any route is
//!   touched; a failed registration leaves the catalog as it was
//! - Runs once, single-threaded, strictly before traffic is accepted

use crate::catalog::hash::{aggregate_token, short_token};
use crate::catalog::{Dataset, DatasetCatalog};
use crate::http::path::decompose;
use crate::registry::{HashRegistry, DEFAULT_DELIMITER};

/// Separator between a route and its output format, e.g. `docs-abcdef0.json`.
pub const FORMAT_SEPARATOR: char = '.';

/// Configuration errors detected while registering routes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("dataset name {name:?} contains the route delimiter {delimiter:?}")]
    DelimiterInName { name: String, delimiter: char },

    #[error("dataset name {name:?} contains the format separator '.'")]
    FormatSeparatorInName { name: String },

    #[error("dataset {name:?} is shadowed by the hashed route of {hashed:?}")]
    Shadowed { name: String, hashed: String },

    #[error("aggregate name {name:?} is already used by a hashed dataset")]
    AggregateNameTaken { name: String },
}

/// Assigns hashed routes to datasets.
#[derive(Debug, Clone)]
pub struct Registrar {
    delimiter: char,
    aggregate: Option<String>,
}

impl Registrar {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            aggregate: None,
        }
    }

    /// Enable the aggregate dataset under `name`.
    pub fn with_aggregate(mut self, name: impl Into<String>) -> Self {
        self.aggregate = Some(name.into());
        self
    }

    /// Rewrite routes of hashed datasets and return the token registry.
    pub fn register(&self, catalog: &mut DatasetCatalog) -> Result<HashRegistry, RegistrationError> {
        self.check_names(catalog)?;

        let mut registry = HashRegistry::new(self.delimiter);
        let mut hashes = Vec::new();

        for dataset in catalog.iter_mut() {
            let Some(hash) = dataset.content_hash() else {
                continue;
            };
            let token = short_token(hash);
            hashes.push(hash.to_string());

            let route = format!("{}{}{}", dataset.name(), self.delimiter, token);
            tracing::info!(dataset = %dataset.name(), route = %route, "Registered hashed route");
            registry.insert(dataset.name(), token);
            dataset.set_route(route);
        }

        if let Some(name) = self.aggregate.as_deref() {
            if !hashes.is_empty() {
                let token = aggregate_token(hashes.iter().map(String::as_str));
                let route = format!("{}{}{}", name, self.delimiter, token);
                tracing::info!(dataset = %name, route = %route, constituents = hashes.len(), "Registered aggregate route");

                if catalog.get(name).is_none() {
                    // Names were checked above, so this cannot collide.
                    let _ = catalog.insert(Dataset::mutable(name));
                }
                if let Some(dataset) = catalog.get_mut(name) {
                    dataset.set_route(route);
                }
                registry.insert(name, token);
            }
        }

        Ok(registry)
    }

    fn check_names(&self, catalog: &DatasetCatalog) -> Result<(), RegistrationError> {
        let mut hashed: Vec<&str> = catalog
            .iter()
            .filter(|d| d.is_hashed())
            .map(Dataset::name)
            .collect();
        if let Some(name) = self.aggregate.as_deref() {
            if hashed.contains(&name) {
                return Err(RegistrationError::AggregateNameTaken {
                    name: name.to_string(),
                });
            }
            if !hashed.is_empty() {
                hashed.push(name);
            }
        }

        for name in &hashed {
            if name.contains(self.delimiter) {
                return Err(RegistrationError::DelimiterInName {
                    name: name.to_string(),
                    delimiter: self.delimiter,
                });
            }
            if name.contains(FORMAT_SEPARATOR) {
                return Err(RegistrationError::FormatSeparatorInName {
                    name: name.to_string(),
                });
            }
        }

        // Any other dataset the middleware would parse as a hashed one.
        let mut provisional = HashRegistry::new(self.delimiter);
        for name in &hashed {
            provisional.insert(*name, "");
        }
        for dataset in catalog.iter().filter(|d| !hashed.contains(&d.name())) {
            if let Some(segment) = decompose(&provisional, dataset.name()) {
                return Err(RegistrationError::Shadowed {
                    name: dataset.name().to_string(),
                    hashed: segment.dataset.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}
