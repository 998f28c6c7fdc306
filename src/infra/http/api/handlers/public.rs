//! Public read handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use crate::application::pagination::PageRequest;
use crate::domain::types::TravelList;
use crate::infra::uploads::UploadStorageError;

use super::{pagination_to_api, repo_to_api, upload_storage_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{PostListQuery, PostSummary};
use crate::infra::http::api::state::ApiState;

pub async fn list_published_posts(
    State(state): State<ApiState>,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::new(query.page, query.size).map_err(pagination_to_api)?;
    let page = state
        .feed
        .published_posts(query.tag, request)
        .await
        .map_err(repo_to_api)?;
    Ok(Json(page.map(PostSummary::from)))
}

pub async fn get_published_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.feed.post_by_slug(&slug).await.map_err(repo_to_api)? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::not_found("Post not found")),
    }
}

pub async fn list_public_tags(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state.feed.tags().await.map_err(repo_to_api)?;
    Ok(Json(tags))
}

pub async fn get_published_page(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.pages.published_page(&slug).await.map_err(repo_to_api)? {
        Some(page) => Ok(Json(page)),
        None => Err(ApiError::not_found("Page not found")),
    }
}

pub async fn list_public_nav_links(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let links = state.chrome.visible_nav_links().await.map_err(repo_to_api)?;
    Ok(Json(links))
}

pub async fn list_public_social_links(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let links = state.chrome.social_links().await.map_err(repo_to_api)?;
    Ok(Json(links))
}

pub async fn list_visited_countries(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let countries = state
        .travels
        .countries(TravelList::Visited)
        .await
        .map_err(repo_to_api)?;
    Ok(Json(countries))
}

pub async fn list_wishlist_countries(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let countries = state
        .travels
        .countries(TravelList::Wishlist)
        .await
        .map_err(repo_to_api)?;
    Ok(Json(countries))
}

pub async fn get_profile(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let profile = state.chrome.profile().await.map_err(repo_to_api)?;
    Ok(Json(profile))
}

pub async fn serve_upload(
    State(state): State<ApiState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let data = match state.upload_storage.read(&file).await {
        Ok(data) => data,
        Err(UploadStorageError::InvalidPath) => return Err(ApiError::not_found("Upload not found")),
        Err(UploadStorageError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("Upload not found"));
        }
        Err(err) => return Err(upload_storage_to_api(err)),
    };

    let mime = mime_guess::from_path(&file).first_or_octet_stream();
    let mut response = data.into_response();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    Ok(response)
}
