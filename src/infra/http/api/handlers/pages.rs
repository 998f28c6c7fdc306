//! Pages handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::admin::pages::{CreatePageCommand, UpdatePageCommand};

use super::page_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{PageCreateRequest, PageUpdateRequest};
use crate::infra::http::api::state::ApiState;

pub async fn list_pages(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let pages = state.admin_pages.list().await.map_err(page_to_api)?;
    Ok(Json(pages))
}

pub async fn get_page(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.admin_pages.find(id).await.map_err(page_to_api)?;
    Ok(Json(page))
}

pub async fn create_page(
    State(state): State<ApiState>,
    Json(payload): Json<PageCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePageCommand {
        title: payload.title,
        slug: payload.slug,
        content: payload.content,
        published: payload.published,
    };

    let page = state
        .admin_pages
        .create_page(command)
        .await
        .map_err(page_to_api)?;

    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn update_page(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<PageUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdatePageCommand {
        title: payload.title,
        slug: payload.slug,
        content: payload.content,
        published: payload.published,
    };

    let page = state
        .admin_pages
        .update_page(id, command)
        .await
        .map_err(page_to_api)?;

    Ok(Json(page))
}

pub async fn delete_page(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.admin_pages.delete_page(id).await.map_err(page_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
