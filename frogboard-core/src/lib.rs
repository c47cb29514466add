//! frogboard-core: posts, boards and the HTML template boundary
//!
//! - `models`: validated newtypes and the immutable [`Post`]
//! - `board`: per-board aggregation (ordering, threads, citations)
//! - `render`: template registry, content formatting and page rendering
//! - `ban`: IP bans loaded from configuration

pub mod ban;
pub mod board;
pub mod citation;
pub mod error;
pub mod models;
pub mod render;

pub use ban::{Ban, BanList};
pub use board::{BoardAggregator, BoardDirectory, Order, PostListing, PostView, ThreadView};
pub use error::{BoardError, DuplicateIdError, Result};
pub use models::{
    Author, BoardId, BoardInfo, Paginated, Pagination, Post, PostContent, PostId, ThreadTitle,
    ValidationError,
};
pub use render::{Renderer, TemplateBindingError};
