//! Forwarding to the upstream dataset server.
//!
//! This is the downstream handler the hashed URL middleware wraps. It sends
//! each request to a single upstream unchanged, except that hashed routes are
//! optionally rewritten to plain dataset names first.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::request_id;
use crate::routing::RouteTable;

/// Invalid upstream base URL.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream url {0:?} has no host")]
    MissingHost(String),

    #[error("invalid upstream authority {authority:?}: {source}")]
    Authority {
        authority: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// Client for the upstream server.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    routes: Option<Arc<RouteTable>>,
}

impl Upstream {
    /// Create a forwarder for `base_url`. With `routes`, hashed routes are
    /// rewritten to dataset names before forwarding.
    pub fn new(base_url: &str, routes: Option<RouteTable>) -> Result<Self, UpstreamError> {
        let url = url::Url::parse(base_url).map_err(|source| UpstreamError::Url {
            url: base_url.to_string(),
            source,
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| UpstreamError::MissingHost(base_url.to_string()))?;
        let port = url.port_or_known_default().unwrap_or(80);
        let authority = format!("{}:{}", host, port);
        let authority = authority
            .parse::<Authority>()
            .map_err(|source| UpstreamError::Authority { authority, source })?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            authority,
            routes: routes.map(Arc::new),
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Absolute upstream URI for an incoming request URI.
    pub fn target_uri(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path = uri.path();
        let path = self
            .routes
            .as_ref()
            .and_then(|routes| routes.rewrite_path(path))
            .unwrap_or_else(|| path.to_string());
        let path_and_query = match uri.query() {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };

        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Forward a request upstream and stream the response back.
pub async fn forward_handler(State(upstream): State<Upstream>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    let uri = match upstream.target_uri(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(request_id = %request_id, uri = %parts.uri, error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        upstream = %uri,
        "Forwarding request"
    );

    parts.uri = uri;
    parts.version = Version::HTTP_11;

    match upstream.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
