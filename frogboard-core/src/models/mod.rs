//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod board;
pub mod pagination;
pub mod post;
pub mod thread;
pub mod validation;

pub use board::{BoardId, BoardInfo};
pub use pagination::{Paginated, Pagination};
pub use post::{Author, Post, PostContent, PostId, DEFAULT_MAX_CONTENT_LEN};
pub use thread::ThreadTitle;
pub use validation::ValidationError;
