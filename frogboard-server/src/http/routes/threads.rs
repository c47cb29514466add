//! Thread pages and replies

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use frogboard_core::{Author, PostContent};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ValidBoard, ValidPostId};
use crate::state::AppState;

/// Reply form
#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

/// GET /{board}/{post}/ - a thread, or a redirect to the thread holding a reply
async fn thread_page(
    State(state): State<AppState>,
    ValidBoard(board): ValidBoard,
    ValidPostId(id): ValidPostId,
) -> Result<Response, ApiError> {
    if let Some(thread) = board.thread(id) {
        let page = state
            .renderer()
            .render_thread_page(board.info(), state.boards(), &thread)?;
        return Ok(Html(page.into_string()).into_response());
    }

    let thread = board
        .thread_of(id)
        .ok_or_else(|| ApiError::not_found("post", id))?;
    let location = format!("/{}/{}/#p{}", board.info().id, thread, id);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// POST /{board}/{post}/ - reply to a thread
async fn reply(
    State(state): State<AppState>,
    ValidBoard(board): ValidBoard,
    ValidPostId(thread): ValidPostId,
    Form(form): Form<ReplyForm>,
) -> Result<Redirect, ApiError> {
    let content = PostContent::with_max_len(&form.content, state.max_content_len())?;
    let author = Author::new(&form.author)?;

    let post = board.reply(thread, content, author, Utc::now())?;
    tracing::info!(board = %board.info().id, %thread, post = %post.id(), "Reply added");

    Ok(Redirect::to(&format!(
        "/{}/{}/#{}",
        board.info().id,
        thread,
        post.anchor()
    )))
}

/// Thread routes
pub fn router() -> Router<AppState> {
    Router::new().route("/{board}/{post}/", get(thread_page).post(reply))
}
