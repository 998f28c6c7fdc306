//! Navigation handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::admin::navigation::AdminNavigationError;
use crate::domain::navigation::NavTarget;

use super::nav_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{NavLinkCreateRequest, ReorderRequest};
use crate::infra::http::api::state::ApiState;

pub async fn list_nav_links(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let links = state.admin_navigation.list().await.map_err(nav_to_api)?;
    Ok(Json(links))
}

pub async fn create_nav_link(
    State(state): State<ApiState>,
    Json(payload): Json<NavLinkCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target = NavTarget::from_parts(payload.page_id, payload.custom_label, payload.custom_url)
        .map_err(|err| nav_to_api(AdminNavigationError::Target(err)))?;

    let link = state
        .admin_navigation
        .add_link(target)
        .await
        .map_err(nav_to_api)?;

    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn delete_nav_link(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .admin_navigation
        .delete_link(id)
        .await
        .map_err(nav_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_nav_links(
    State(state): State<ApiState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let links = state
        .admin_navigation
        .reorder(&payload.ordered_ids)
        .await
        .map_err(nav_to_api)?;
    Ok(Json(links))
}
