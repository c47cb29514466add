//! Error types for frogboard-core
//!
//! Library errors are structured (`thiserror`); the CLI wraps them in
//! `anyhow` and the HTTP layer maps them to status codes.

use thiserror::Error;

use crate::models::{PostId, ValidationError};

/// A post id collided with one already on the board
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("post {id} already exists")]
pub struct DuplicateIdError {
    pub id: PostId,
}

/// Errors from board operations
#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DuplicateId(#[from] DuplicateIdError),

    #[error("board '{0}' already exists")]
    DuplicateBoard(String),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },
}

impl BoardError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, BoardError>;
