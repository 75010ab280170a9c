//! Shared utilities for integration testing.

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

use hashed_urls::config::{DatasetConfig, HashedUrlsConfig};
use hashed_urls::{HttpServer, Shutdown};

/// Start a mock dataset server on an ephemeral port.
///
/// Echoes `path?query` in the body and sets `cache-control: max-age=5` on
/// every response. A query of `sql=error` returns 400.
pub async fn start_mock_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(|req: Request<Body>| async move {
        let status = if req.uri().query() == Some("sql=error") {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        let body = match req.uri().query() {
            Some(q) => format!("{}?{}", req.uri().path(), q),
            None => req.uri().path().to_string(),
        };
        (status, [(header::CACHE_CONTROL, "max-age=5")], body).into_response()
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub fn immutable(name: &str, hash: &str) -> DatasetConfig {
    DatasetConfig {
        name: name.to_string(),
        hash: Some(hash.to_string()),
        file: None,
        immutable: true,
    }
}

pub fn mutable(name: &str) -> DatasetConfig {
    DatasetConfig {
        name: name.to_string(),
        hash: None,
        file: None,
        immutable: false,
    }
}

/// A running server and its shutdown handle.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server in front of `upstream` with the given config tweaks.
pub async fn start_server(upstream: SocketAddr, mut config: HashedUrlsConfig) -> TestServer {
    config.upstream.url = format!("http://{}", upstream);
    let server = HttpServer::new(config).expect("startup failed");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer { addr, shutdown }
}

/// Client that does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
