//! JSON API

use axum::{routing::get, Json, Router};
use chrono::SecondsFormat;
use frogboard_core::render::board_content;
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ValidBoard, ValidPostId};
use crate::state::AppState;

/// A post with its formatted content
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub board: String,
    pub id: u64,
    /// Opening post of the thread this post belongs to
    pub thread: Option<u64>,
    pub author: String,
    pub created_at: String,
    pub content: String,
    /// Content as it appears on the board
    pub html: String,
    pub cites: Vec<u64>,
    pub cited_by: Vec<u64>,
}

/// GET /api/post/{board}/{post}/
async fn get_post(
    ValidBoard(board): ValidBoard,
    ValidPostId(id): ValidPostId,
) -> Result<Json<PostResponse>, ApiError> {
    let view = board
        .post(id)
        .ok_or_else(|| ApiError::not_found("post", id))?;
    let html = board_content(&board.info().id, &view).into_string();
    let post = &view.post;

    Ok(Json(PostResponse {
        board: board.info().id.to_string(),
        id: post.id().get(),
        thread: board.thread_of(id).map(|t| t.get()),
        author: post.author().as_str().to_owned(),
        created_at: post.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        content: post.content().as_str().to_owned(),
        html,
        cites: view.cites.iter().map(|c| c.get()).collect(),
        cited_by: view.cited_by.iter().map(|c| c.get()).collect(),
    }))
}

/// API routes
pub fn router() -> Router<AppState> {
    Router::new().route("/api/post/{board}/{post}/", get(get_post))
}
