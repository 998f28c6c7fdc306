//! Travel list handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::entities::CountryRecord;
use crate::domain::types::TravelList;

use super::travel_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::CountryCreateRequest;
use crate::infra::http::api::state::ApiState;

async fn list_countries(
    state: &ApiState,
    list: TravelList,
) -> Result<Json<Vec<CountryRecord>>, ApiError> {
    let countries = state.admin_travels.list(list).await.map_err(travel_to_api)?;
    Ok(Json(countries))
}

async fn add_country(
    state: &ApiState,
    list: TravelList,
    payload: CountryCreateRequest,
) -> Result<(StatusCode, Json<CountryRecord>), ApiError> {
    let country = state
        .admin_travels
        .add_country(list, &payload.name, payload.iso_numeric)
        .await
        .map_err(travel_to_api)?;
    Ok((StatusCode::CREATED, Json(country)))
}

async fn remove_country(
    state: &ApiState,
    list: TravelList,
    id: i64,
) -> Result<StatusCode, ApiError> {
    state
        .admin_travels
        .delete_country(list, id)
        .await
        .map_err(travel_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_visited(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    list_countries(&state, TravelList::Visited).await
}

pub async fn add_visited(
    State(state): State<ApiState>,
    Json(payload): Json<CountryCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    add_country(&state, TravelList::Visited, payload).await
}

pub async fn delete_visited(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    remove_country(&state, TravelList::Visited, id).await
}

pub async fn list_wishlist(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    list_countries(&state, TravelList::Wishlist).await
}

pub async fn add_wishlist(
    State(state): State<ApiState>,
    Json(payload): Json<CountryCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    add_country(&state, TravelList::Wishlist, payload).await
}

pub async fn delete_wishlist(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    remove_country(&state, TravelList::Wishlist, id).await
}
