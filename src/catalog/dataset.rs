//! A single named dataset exposed by the host.

/// A named, queryable data source.
///
/// `route` is what host routing exposes publicly. It starts out equal to the
/// name and is rewritten once, at startup, for datasets that carry a content
/// hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    name: String,
    content_hash: Option<String>,
    route: String,
}

impl Dataset {
    /// A mutable dataset: no content hash, route stays the plain name.
    pub fn mutable(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            route: name.clone(),
            name,
            content_hash: None,
        }
    }

    /// An immutable dataset with a stable content hash.
    pub fn immutable(name: impl Into<String>, content_hash: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            route: name.clone(),
            name,
            content_hash: Some(content_hash.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The content hash, if present and non-empty.
    pub fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref().filter(|h| !h.is_empty())
    }

    pub fn is_hashed(&self) -> bool {
        self.content_hash().is_some()
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub(crate) fn set_route(&mut self, route: String) {
        self.route = route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_defaults_to_name() {
        let d = Dataset::immutable("docs", "abcdef0123");
        assert_eq!(d.route(), "docs");
        assert_eq!(d.content_hash(), Some("abcdef0123"));
    }

    #[test]
    fn test_empty_hash_is_unhashed() {
        let d = Dataset::immutable("docs", "");
        assert!(!d.is_hashed());
        assert!(!Dataset::mutable("notes").is_hashed());
    }
}
