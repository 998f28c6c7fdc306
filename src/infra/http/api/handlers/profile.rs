//! Site profile handlers

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::TryStreamExt;
use tracing::error;

use crate::application::admin::profile::photo_extension;
use crate::infra::uploads::UploadStorageError;

use super::{profile_to_api, upload_storage_to_api};
use crate::infra::http::api::error::{ApiError, codes};
use crate::infra::http::api::models::ProfileUpdateRequest;
use crate::infra::http::api::state::ApiState;

pub async fn update_profile(
    State(state): State<ApiState>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .admin_profile
        .update_profile(payload.photo_url, payload.bio)
        .await
        .map_err(profile_to_api)?;
    Ok(Json(profile))
}

/// Accepts a multipart body whose `file` field is the new photo.
pub async fn upload_profile_photo(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                let status = err.status();
                error!(
                    target = "folio::http::profile",
                    status = status.as_u16(),
                    error = %err,
                    "failed to read multipart payload"
                );
                if status == StatusCode::PAYLOAD_TOO_LARGE {
                    return Err(ApiError::new(
                        status,
                        codes::UPLOAD,
                        "Upload too large",
                        None,
                    ));
                }
                return Err(ApiError::bad_request(
                    "Invalid multipart payload",
                    Some(err.to_string()),
                ));
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_default();
        let extension = photo_extension(&content_type).map_err(profile_to_api)?;

        let stream = field.map_err(|err| UploadStorageError::PayloadStream {
            source: Box::new(err),
        });
        let stored = state
            .upload_storage
            .store_profile_photo(extension, stream)
            .await
            .map_err(upload_storage_to_api)?;

        let profile = state
            .admin_profile
            .attach_photo(&stored.file_name)
            .await
            .map_err(profile_to_api)?;
        return Ok(Json(profile));
    }

    Err(ApiError::bad_request(
        "Missing file",
        Some("expected a multipart field named `file`".to_string()),
    ))
}
