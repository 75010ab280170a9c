//! Request path decomposition.
//!
//! The first path segment carries the dataset name, an optional hash token
//! and an optional format suffix: `/{name}{delim}{token}.{format}/rest`.
//! Parsing order is fixed: format suffix first, then "whole segment is a
//! known dataset", then a split on the *last* delimiter.
//!
//! Dataset names are matched in decoded form; the first segment is
//! percent-decoded before parsing and re-encoded when a path is rebuilt.

use std::borrow::Cow;

use crate::registry::HashRegistry;
use crate::registrar::FORMAT_SEPARATOR;

/// Split a path into its first segment and everything after it.
///
/// Leading slashes are dropped; the remainder keeps its leading `/`.
pub fn split_first_segment(path: &str) -> (&str, &str) {
    let path = path.trim_start_matches('/');
    match path.find('/') {
        Some(idx) => (&path[..idx], &path[idx..]),
        None => (path, ""),
    }
}

/// Percent-decode a path segment. `None` if the bytes are not UTF-8.
pub fn decode_segment(segment: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(segment).ok()
}

/// Percent-encode a decoded segment for use in a path or `Location`.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

/// Split `name.json` into `("name", Some("json"))`. An empty format is absent.
pub fn split_format(segment: &str) -> (&str, Option<&str>) {
    match segment.split_once(FORMAT_SEPARATOR) {
        Some((base, format)) => (base, Some(format).filter(|f| !f.is_empty())),
        None => (segment, None),
    }
}

/// A first segment resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSegment<'a> {
    pub dataset: &'a str,
    /// Token supplied by the client; empty when none was given.
    pub token: &'a str,
    pub format: Option<&'a str>,
}

/// Resolve a first segment to a registered dataset, if it names one.
///
/// Returns `None` for segments that are not dataset-routed at all.
pub fn decompose<'a>(registry: &HashRegistry, segment: &'a str) -> Option<DatasetSegment<'a>> {
    let delimiter = registry.delimiter();
    let (without_format, format) = split_format(segment);

    if registry.contains(without_format) {
        return Some(DatasetSegment {
            dataset: without_format,
            token: "",
            format,
        });
    }

    let (dataset, token) = without_format.rsplit_once(delimiter)?;
    registry.contains(dataset).then_some(DatasetSegment {
        dataset,
        token,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> HashRegistry {
        let mut registry = HashRegistry::new('-');
        registry.insert("docs", "abcdef0");
        registry.insert("my-data", "1234567");
        registry
    }

    #[test]
    fn test_split_first_segment() {
        assert_eq!(split_first_segment("/docs/t/1"), ("docs", "/t/1"));
        assert_eq!(split_first_segment("/docs"), ("docs", ""));
        assert_eq!(split_first_segment("/docs/"), ("docs", "/"));
        assert_eq!(split_first_segment("/"), ("", ""));
    }

    #[test]
    fn test_segment_coding() {
        assert_eq!(decode_segment("my%20data").as_deref(), Some("my data"));
        assert_eq!(decode_segment("caf%C3%A9").as_deref(), Some("café"));
        assert_eq!(decode_segment("%FF"), None);
        assert_eq!(encode_segment("my data-abcdef0"), "my%20data-abcdef0");
        assert_eq!(encode_segment("café"), "caf%C3%A9");
    }

    #[test]
    fn test_split_format() {
        assert_eq!(split_format("docs.json"), ("docs", Some("json")));
        assert_eq!(split_format("docs"), ("docs", None));
        assert_eq!(split_format("docs."), ("docs", None));
    }

    #[test]
    fn test_decompose_plain_name() {
        let registry = registry();
        assert_eq!(
            decompose(&registry, "docs.json"),
            Some(DatasetSegment { dataset: "docs", token: "", format: Some("json") })
        );
    }

    #[test]
    fn test_decompose_with_token() {
        let registry = registry();
        assert_eq!(
            decompose(&registry, "docs-abcdef0"),
            Some(DatasetSegment { dataset: "docs", token: "abcdef0", format: None })
        );
        assert_eq!(
            decompose(&registry, "docs-wrongtoken.csv"),
            Some(DatasetSegment { dataset: "docs", token: "wrongtoken", format: Some("csv") })
        );
    }

    #[test]
    fn test_decompose_name_containing_delimiter() {
        let registry = registry();
        assert_eq!(
            decompose(&registry, "my-data"),
            Some(DatasetSegment { dataset: "my-data", token: "", format: None })
        );
        assert_eq!(
            decompose(&registry, "my-data-1234567"),
            Some(DatasetSegment { dataset: "my-data", token: "1234567", format: None })
        );
    }

    #[test]
    fn test_decompose_unknown() {
        let registry = registry();
        assert_eq!(decompose(&registry, "unrelated"), None);
        assert_eq!(decompose(&registry, "other-abcdef0"), None);
        assert_eq!(decompose(&registry, ""), None);
        assert_eq!(decompose(&registry, "docs-a-b"), None);
    }
}
