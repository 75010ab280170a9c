//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware/hashed_urls.rs (redirect / passthrough / canonical)
//!         → path.rs (first segment decomposition)
//!     → upstream.rs (forward to dataset server)
//!     → response.rs (cache-control on canonical responses)
//!     → Send to client
//! ```

pub mod middleware;
pub mod path;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use middleware::HashedUrls;
pub use request::X_REQUEST_ID;
pub use response::CachePolicy;
pub use server::HttpServer;
