//! HTTP API layer for promptstash.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: entries (list/detail/create), directories, common tags
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: per-request token lookup
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;
