//! Tags handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::tag_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::TagCreateRequest;
use crate::infra::http::api::state::ApiState;

pub async fn create_tag(
    State(state): State<ApiState>,
    Json(payload): Json<TagCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tag = state
        .admin_tags
        .create_tag(&payload.name)
        .await
        .map_err(tag_to_api)?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete_tag(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.admin_tags.delete_tag(id).await.map_err(tag_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
