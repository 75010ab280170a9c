//! Host-side routing of public dataset routes.
//!
//! # Data Flow
//! ```text
//! DatasetCatalog (routes rewritten by the registrar)
//!     → RouteTable (public route → dataset name)
//!     → upstream forwarding rewrites `/docs-abcdef0.json/t` to `/docs.json/t`
//! ```
//!
//! # Design Decisions
//! - Built after registration, immutable at runtime
//! - Only routes that differ from the dataset name are stored

use std::collections::HashMap;

use crate::catalog::DatasetCatalog;
use crate::http::path::{decode_segment, encode_segment, split_first_segment, split_format};

/// Lookup from public route to dataset name.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn from_catalog(catalog: &DatasetCatalog) -> Self {
        let routes = catalog
            .iter()
            .filter(|d| d.route() != d.name())
            .map(|d| (d.route().to_string(), d.name().to_string()))
            .collect();
        Self { routes }
    }

    /// Dataset served under `route`, if any.
    pub fn resolve(&self, route: &str) -> Option<&str> {
        self.routes.get(route).map(String::as_str)
    }

    /// Rewrite a request path whose first segment is a public route so it
    /// addresses the dataset by name. Returns `None` if nothing changes.
    pub fn rewrite_path(&self, path: &str) -> Option<String> {
        let (first, rest) = split_first_segment(path);
        let first = decode_segment(first)?;
        let (route, format) = split_format(&first);
        let name = self.resolve(route)?;

        let mut rewritten = format!("/{}", encode_segment(name));
        if let Some(format) = format {
            rewritten.push('.');
            rewritten.push_str(&encode_segment(format));
        }
        rewritten.push_str(rest);
        Some(rewritten)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
