//! Request middleware

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;

use super::error::ApiError;
use crate::state::AppState;

/// Answer requests from actively banned addresses with 403 and the ban page.
///
/// The peer address comes from `ConnectInfo`; requests without it pass.
pub async fn reject_banned(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ConnectInfo(peer)) = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .cloned()
    else {
        return next.run(request).await;
    };

    let ip = peer.ip().to_canonical();
    let Some(ban) = state.bans().active(ip, Utc::now()) else {
        return next.run(request).await;
    };

    tracing::warn!(
        %ip,
        reason = %ban.reason,
        path = %request.uri().path(),
        "Rejected request from banned address"
    );

    match state.renderer().render_ban_page(ban) {
        Ok(page) => (StatusCode::FORBIDDEN, Html(page.into_string())).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
