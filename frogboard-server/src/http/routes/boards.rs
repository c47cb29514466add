//! Board pages: index, board front page, new threads and the flat feed

use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use frogboard_core::{Author, Order, Pagination, PostContent, ThreadTitle};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ValidBoard, ValidQuery};
use crate::state::AppState;

/// `?page=N` on board pages
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

/// `?order=asc|desc` on the feed
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    #[serde(default)]
    pub order: Order,
}

/// New thread form
#[derive(Debug, Deserialize)]
pub struct NewThreadForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

/// GET / - list boards
async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let page = state.renderer().render_index(state.boards())?;
    Ok(Html(page.into_string()))
}

/// GET /{board}/ - latest threads, most recently bumped first
async fn board_page(
    State(state): State<AppState>,
    ValidBoard(board): ValidBoard,
    ValidQuery(params): ValidQuery<PageParams>,
) -> Result<Html<String>, ApiError> {
    let window = Pagination::new(params.page.unwrap_or(1), state.page_size());
    let threads = board.latest_threads(window, state.reply_preview());

    let page = state
        .renderer()
        .render_board_page(board.info(), state.boards(), &threads)?;
    Ok(Html(page.into_string()))
}

/// POST /{board}/ - start a thread
async fn create_thread(
    State(state): State<AppState>,
    ValidBoard(board): ValidBoard,
    Form(form): Form<NewThreadForm>,
) -> Result<Redirect, ApiError> {
    let title = ThreadTitle::new(&form.title)?;
    let content = PostContent::with_max_len(&form.content, state.max_content_len())?;
    let author = Author::new(&form.author)?;

    let post = board.create_thread(title, content, author, Utc::now())?;
    tracing::info!(board = %board.info().id, thread = %post.id(), "Thread created");

    Ok(Redirect::to(&format!("/{}/{}/", board.info().id, post.id())))
}

/// GET /{board}/feed/ - every post on the board as one flat document
async fn feed(
    State(state): State<AppState>,
    ValidBoard(board): ValidBoard,
    ValidQuery(params): ValidQuery<FeedParams>,
) -> Result<Html<String>, ApiError> {
    let listing = board.list_posts(params.order);
    let heading = format!("/{}/ - {}", board.info().id, board.info().full_name);

    let page = state.renderer().render_feed(&heading, &listing)?;
    Ok(Html(page.into_string()))
}

/// Board routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{board}/", get(board_page).post(create_thread))
        .route("/{board}/feed/", get(feed))
}
