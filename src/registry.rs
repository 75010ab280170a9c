//! Dataset name → hash token lookup shared with the middleware.
//!
//! Built once by the registrar and never mutated afterwards, so it is shared
//! across request tasks behind an `Arc` without locking.

use std::collections::HashMap;

/// Delimiter used between dataset name and hash token by default.
pub const DEFAULT_DELIMITER: char = '-';

/// Immutable mapping from dataset name to its current hash token.
#[derive(Debug, Clone)]
pub struct HashRegistry {
    tokens: HashMap<String, String>,
    delimiter: char,
}

impl HashRegistry {
    pub(crate) fn new(delimiter: char) -> Self {
        Self {
            tokens: HashMap::new(),
            delimiter,
        }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(name.into(), token.into());
    }

    /// Current token for a dataset.
    pub fn token(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Public route for a registered dataset, e.g. `docs-abcdef0`.
    pub fn route_for(&self, name: &str) -> Option<String> {
        self.token(name)
            .map(|token| format!("{}{}{}", name, self.delimiter, token))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for HashRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for() {
        let mut registry = HashRegistry::new('_');
        registry.insert("docs", "abcdef0");

        assert_eq!(registry.route_for("docs").as_deref(), Some("docs_abcdef0"));
        assert_eq!(registry.route_for("other"), None);
        assert!(registry.contains("docs"));
        assert_eq!(registry.len(), 1);
    }
}
