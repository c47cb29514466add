//! Custom Axum extractors

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use frogboard_core::{BoardAggregator, BoardId, PostId, ValidationError};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::state::AppState;

async fn path_param(
    parts: &mut Parts,
    state: &AppState,
    name: &'static str,
) -> Result<String, ApiError> {
    let Path(mut params): Path<HashMap<String, String>> =
        Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: name }))?;

    params
        .remove(name)
        .ok_or(ApiError::Validation(ValidationError::Empty { field: name }))
}

/// Board named by the `{board}` path segment
pub struct ValidBoard(pub Arc<BoardAggregator>);

impl FromRequestParts<AppState> for ValidBoard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = path_param(parts, state, "board").await?;
        let id = BoardId::new(&raw)?;

        state
            .board(id.as_str())
            .map(Self)
            .ok_or_else(|| ApiError::not_found("board", id))
    }
}

/// Post number from the `{post}` path segment
pub struct ValidPostId(pub PostId);

impl FromRequestParts<AppState> for ValidPostId {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = path_param(parts, state, "post").await?;

        let id = raw
            .parse::<u64>()
            .map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "post id",
                    reason: "must be a positive integer",
                })
            })
            .and_then(|n| PostId::new(n).map_err(ApiError::from))?;

        Ok(Self(id))
    }
}

/// `Query<T>` whose rejection is a JSON [`ApiError`]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest {
                message: rejection.body_text(),
            })?;
        Ok(Self(value))
    }
}
