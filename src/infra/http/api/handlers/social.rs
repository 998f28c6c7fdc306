//! Social link handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::social_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{ReorderRequest, SocialLinkCreateRequest};
use crate::infra::http::api::state::ApiState;

pub async fn list_social_links(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let links = state.admin_social.list().await.map_err(social_to_api)?;
    Ok(Json(links))
}

pub async fn create_social_link(
    State(state): State<ApiState>,
    Json(payload): Json<SocialLinkCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state
        .admin_social
        .add_link(&payload.platform, &payload.url)
        .await
        .map_err(social_to_api)?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn delete_social_link(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .admin_social
        .delete_link(id)
        .await
        .map_err(social_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_social_links(
    State(state): State<ApiState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let links = state
        .admin_social
        .reorder(&payload.ordered_ids)
        .await
        .map_err(social_to_api)?;
    Ok(Json(links))
}
