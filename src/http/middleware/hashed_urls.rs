//! Hashed URL middleware.
//!
//! Redirects requests for hashed datasets to their canonical
//! `/{name}-{token}` path and marks responses served from canonical paths as
//! cacheable for `max_age` seconds. Everything else passes through.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::http::path::{decode_segment, decompose, encode_segment, split_first_segment};
use crate::http::response::{redirect, CachePolicy};
use crate::registry::HashRegistry;

/// Middleware state: the startup registry plus response policy.
#[derive(Debug, Clone)]
pub struct HashedUrls {
    registry: Arc<HashRegistry>,
    policy: CachePolicy,
    cors: bool,
}

/// Outcome of inspecting a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not a dataset route.
    Passthrough,
    /// Token missing or stale; redirect to `location`.
    Redirect { dataset: String, location: String },
    /// Token matches; serve and mark cacheable.
    Canonical { dataset: String },
}

impl HashedUrls {
    pub fn new(registry: Arc<HashRegistry>, policy: CachePolicy) -> Self {
        Self {
            registry,
            policy,
            cors: false,
        }
    }

    /// Add CORS headers to redirect responses.
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    pub fn registry(&self) -> &HashRegistry {
        &self.registry
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Classify a raw (percent-encoded) request path and optional query
    /// string. Only the first segment is decoded; `rest` and the query are
    /// carried into the redirect verbatim.
    pub fn classify(&self, path: &str, query: Option<&str>) -> Classification {
        let (first, rest) = split_first_segment(path);
        let Some(first) = decode_segment(first) else {
            return Classification::Passthrough;
        };
        let Some(segment) = decompose(&self.registry, &first) else {
            return Classification::Passthrough;
        };
        let Some(current) = self.registry.token(segment.dataset) else {
            return Classification::Passthrough;
        };

        if segment.token == current {
            return Classification::Canonical {
                dataset: segment.dataset.to_string(),
            };
        }

        let canonical = format!("{}{}{}", segment.dataset, self.registry.delimiter(), current);
        let mut location = format!("/{}", encode_segment(&canonical));
        if let Some(format) = segment.format {
            location.push('.');
            location.push_str(&encode_segment(format));
        }
        location.push_str(rest);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            location.push('?');
            location.push_str(query);
        }

        Classification::Redirect {
            dataset: segment.dataset.to_string(),
            location,
        }
    }
}

/// Install the middleware in front of `router`.
pub fn wrap<S>(router: Router<S>, state: HashedUrls) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(state, hashed_urls_middleware))
}

/// WebSocket handshakes are not page requests. Other `Upgrade` offers
/// (e.g. `h2c`) are ordinary HTTP requests and stay subject to redirects.
fn is_websocket_upgrade(req: &Request<Body>) -> bool {
    let headers = req.headers();
    let connection_upgrade = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
    let websocket = headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("websocket"));
    connection_upgrade && websocket
}

pub async fn hashed_urls_middleware(
    State(state): State<HashedUrls>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if is_websocket_upgrade(&req) {
        return next.run(req).await;
    }

    match state.classify(req.uri().path(), req.uri().query()) {
        Classification::Passthrough => next.run(req).await,
        Classification::Redirect { dataset, location } => {
            let value = match HeaderValue::try_from(location.as_str()) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(dataset = %dataset, location = %location, error = %e, "Unencodable redirect target, passing through");
                    return next.run(req).await;
                }
            };
            tracing::debug!(dataset = %dataset, from = %req.uri(), location = %location, "Redirecting to hashed URL");
            metrics::counter!("hashed_urls_redirects_total", "dataset" => dataset).increment(1);
            redirect(value, state.cors)
        }
        Classification::Canonical { dataset } => {
            let mut response = next.run(req).await;
            if state.policy.apply(&mut response) {
                metrics::counter!("hashed_urls_cacheable_responses_total", "dataset" => dataset)
                    .increment(1);
            } else {
                tracing::debug!(dataset = %dataset, status = %response.status(), "Not caching error response");
            }
            response
        }
    }
}
