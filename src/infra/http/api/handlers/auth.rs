//! Login and credential handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::auth::AdminIdentity;

use super::auth_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{LoginRequest, PasswordChangeRequest};
use crate::infra::http::api::state::ApiState;

pub async fn login(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .auth
        .login(&payload.username, &payload.password)
        .await
        .map_err(auth_to_api)?;
    Ok(Json(token))
}

pub async fn change_password(
    State(state): State<ApiState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .auth
        .change_password(&identity, &payload.current_password, &payload.new_password)
        .await
        .map_err(auth_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
