//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Upstream URL must be a plain http URL
//! - Dataset names must be usable as a single path segment
//! - Immutable datasets need a hash source
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HashedUrlsConfig → Result<(), Vec<ValidationError>>
//! - Route ambiguity between datasets is checked by the registrar, which
//!   knows which datasets actually carry a hash

use std::collections::HashSet;

use crate::config::schema::HashedUrlsConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid upstream url {url:?}: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("dataset name must not be empty")]
    EmptyDatasetName,

    #[error("dataset name {0:?} must not contain '/'")]
    SlashInDatasetName(String),

    #[error("duplicate dataset name {0:?}")]
    DuplicateDataset(String),

    #[error("immutable dataset {0:?} needs a hash or a file")]
    MissingHashSource(String),

    #[error("delimiter {0:?} cannot be used inside a path segment")]
    InvalidDelimiter(char),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &HashedUrlsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason: format!("unsupported scheme {}", url.scheme()),
        }),
        Ok(url) if url.host_str().is_none() => errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason: "missing host".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason: e.to_string(),
        }),
    }

    let delimiter = config.hashed_urls.delimiter;
    if matches!(delimiter, '/' | '.' | '?' | '#' | '%') || delimiter.is_whitespace() {
        errors.push(ValidationError::InvalidDelimiter(delimiter));
    }

    let mut seen = HashSet::new();
    for dataset in &config.datasets {
        if dataset.name.is_empty() {
            errors.push(ValidationError::EmptyDatasetName);
            continue;
        }
        if dataset.name.contains('/') {
            errors.push(ValidationError::SlashInDatasetName(dataset.name.clone()));
        }
        if !seen.insert(dataset.name.as_str()) {
            errors.push(ValidationError::DuplicateDataset(dataset.name.clone()));
        }
        if dataset.immutable && dataset.hash.is_none() && dataset.file.is_none() {
            errors.push(ValidationError::MissingHashSource(dataset.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;

    fn dataset(name: &str, immutable: bool) -> DatasetConfig {
        DatasetConfig {
            name: name.to_string(),
            hash: None,
            file: None,
            immutable,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&HashedUrlsConfig::default()), Ok(()));
    }

    #[test]
    fn test_upstream_scheme() {
        let mut config = HashedUrlsConfig::default();
        config.upstream.url = "https://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::UpstreamUrl { .. }));
    }

    #[test]
    fn test_dataset_problems_collected() {
        let mut config = HashedUrlsConfig::default();
        config.hashed_urls.delimiter = '/';
        config.datasets = vec![
            dataset("a/b", false),
            dataset("docs", true),
            dataset("docs", false),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidDelimiter('/'),
                ValidationError::SlashInDatasetName("a/b".into()),
                ValidationError::MissingHashSource("docs".into()),
                ValidationError::DuplicateDataset("docs".into()),
            ]
        );
    }
}
