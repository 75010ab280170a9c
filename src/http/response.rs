//! Response construction and header rewriting.
//!
//! # Responsibilities
//! - Build the 302 redirect to a canonical hashed path
//! - Attach the far-future cache-control header to canonical responses
//!
//! # Design Decisions
//! - Redirects never carry cache-control
//! - Error responses keep whatever headers downstream produced unless
//!   `cache_on_errors` is set

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

/// One year, in seconds.
pub const DEFAULT_MAX_AGE: u64 = 31_536_000;

/// Cache directive applied to responses served from canonical paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: u64,
    pub cache_on_errors: bool,
}

impl CachePolicy {
    /// The `cache-control` value, e.g. `max-age=31536000, public`.
    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::try_from(format!("max-age={}, public", self.max_age))
            .unwrap_or_else(|_| HeaderValue::from_static("public"))
    }

    /// Replace any cache-control header on `response` with this policy.
    ///
    /// Returns false when the response was left alone because it is an error
    /// and errors are not cached.
    pub fn apply(&self, response: &mut Response) -> bool {
        if response.status().as_u16() >= 400 && !self.cache_on_errors {
            return false;
        }
        let headers = response.headers_mut();
        headers.remove(header::CACHE_CONTROL);
        headers.append(header::CACHE_CONTROL, self.header_value());
        true
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            cache_on_errors: false,
        }
    }
}

/// 302 to `location` with an empty body, plus CORS headers when enabled.
pub fn redirect(location: HeaderValue, cors: bool) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::FOUND;

    let headers = response.headers_mut();
    headers.insert(header::LOCATION, location);
    if cors {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("authorization"),
        );
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("link"),
        );
    }
    response
}
