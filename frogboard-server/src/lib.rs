//! frogboard-server: HTTP front end for frogboard boards
//!
//! Serves board pages, accepts new threads and replies, and exposes posts
//! as JSON. All board state lives in memory for the life of the process.

pub mod config;
pub mod http;
pub mod state;

pub use config::{BoardConfig, ConfigError, ServerConfig};
pub use http::{build_router, run_server, ApiError, ServerError};
pub use state::AppState;
