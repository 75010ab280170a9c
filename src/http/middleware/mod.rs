//! Request middleware.

pub mod hashed_urls;

pub use hashed_urls::{hashed_urls_middleware, wrap, Classification, HashedUrls};
