//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Run startup registration before anything is served
//! - Create the Axum Router forwarding to the upstream
//! - Wrap it with the hashed URL middleware
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::catalog::DatasetCatalog;
use crate::config::HashedUrlsConfig;
use crate::http::middleware::hashed_urls::{self, HashedUrls};
use crate::http::request::UuidRequestId;
use crate::http::upstream::{forward_handler, Upstream};
use crate::lifecycle::{shutdown, startup, StartupError};
use crate::registry::HashRegistry;
use crate::routing::RouteTable;

/// HTTP server fronting the upstream dataset server.
pub struct HttpServer {
    router: Router,
    config: HashedUrlsConfig,
    catalog: DatasetCatalog,
    registry: Arc<HashRegistry>,
}

impl HttpServer {
    /// Register hashed routes and assemble the request pipeline.
    pub fn new(config: HashedUrlsConfig) -> Result<Self, StartupError> {
        let prepared = startup::prepare(&config)?;

        let routes = config
            .upstream
            .rewrite_routes
            .then(|| RouteTable::from_catalog(&prepared.catalog));
        let upstream = Upstream::new(&config.upstream.url, routes)?;

        let middleware_state = HashedUrls::new(
            Arc::clone(&prepared.registry),
            config.hashed_urls.cache_policy(),
        )
        .with_cors(config.cors);

        let router = Self::build_router(&config, upstream, middleware_state);
        Ok(Self {
            router,
            config,
            catalog: prepared.catalog,
            registry: prepared.registry,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HashedUrlsConfig, upstream: Upstream, middleware_state: HashedUrls) -> Router {
        let router = Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(upstream);

        hashed_urls::wrap(router, middleware_state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            hashed_datasets = self.registry.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &HashRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HashedUrlsConfig {
        &self.config
    }
}
