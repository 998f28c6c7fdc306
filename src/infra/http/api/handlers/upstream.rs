//! Third-party feed handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;

use super::{letterboxd_to_api, rawg_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::SearchQuery;
use crate::infra::http::api::state::ApiState;

pub async fn recent_films(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let films = state
        .letterboxd
        .recent_films()
        .await
        .map_err(letterboxd_to_api)?;
    Ok(Json(films))
}

pub async fn search_games(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let q = query
        .q
        .ok_or_else(|| ApiError::invalid_input("Missing query", "`q` is required"))?;
    let hits = state.rawg.search(&q).await.map_err(rawg_to_api)?;
    Ok(Json(hits))
}

pub async fn game_details(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = state.rawg.game(&id).await.map_err(rawg_to_api)?;
    Ok(Json(game))
}
