//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - IP ban enforcement
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
