//! Posts handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::admin::posts::{CreatePostCommand, PostMediaInput, UpdatePostCommand};

use super::post_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

fn media_inputs(media: Vec<PostMediaRequest>) -> Vec<PostMediaInput> {
    media
        .into_iter()
        .map(|item| PostMediaInput {
            media_type: item.media_type,
            external_id: item.external_id,
            title: item.title,
            background_image_url: item.background_image_url,
        })
        .collect()
}

pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.admin_posts.list().await.map_err(post_to_api)?;
    let summaries: Vec<PostSummary> = posts.into_iter().map(PostSummary::from).collect();
    Ok(Json(summaries))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.admin_posts.find(id).await.map_err(post_to_api)?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePostCommand {
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        published: payload.published,
        tag_ids: payload.tag_ids,
        media: media_inputs(payload.media),
    };

    let post = state
        .admin_posts
        .create_post(command)
        .await
        .map_err(post_to_api)?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdatePostCommand {
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        published: payload.published,
        tag_ids: payload.tag_ids,
        media: payload.media.map(media_inputs),
    };

    let post = state
        .admin_posts
        .update_post(id, command)
        .await
        .map_err(post_to_api)?;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .admin_posts
        .delete_post(id)
        .await
        .map_err(post_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
