//! API handlers organized by resource type.
//!
//! Each submodule holds the handlers for one resource. The conversions from
//! service errors to [`ApiError`] live here and are shared across modules.

mod auth;
mod navigation;
mod pages;
mod posts;
mod profile;
mod public;
mod social;
mod tags;
mod travels;
mod upstream;

pub use auth::*;
pub use navigation::*;
pub use pages::*;
pub use posts::*;
pub use profile::*;
pub use public::*;
pub use social::*;
pub use tags::*;
pub use travels::*;
pub use upstream::*;

// ----- Shared error conversions -----

use axum::http::StatusCode;

use crate::application::admin::navigation::AdminNavigationError;
use crate::application::admin::pages::AdminPageError;
use crate::application::admin::posts::AdminPostError;
use crate::application::admin::profile::AdminProfileError;
use crate::application::admin::social::AdminSocialError;
use crate::application::admin::tags::AdminTagError;
use crate::application::admin::travels::AdminTravelError;
use crate::application::auth::AuthError;
use crate::application::pagination::PaginationError;
use crate::application::repos::RepoError;
use crate::application::upstream::letterboxd::LetterboxdError;
use crate::application::upstream::rawg::RawgError;
use crate::domain::ordering::ReorderError;
use crate::infra::uploads::UploadStorageError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::conflict("Duplicate record", constraint),
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::invalid_input("Invalid input", message),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Reorder(err) => reorder_to_api(err),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

fn reorder_to_api(err: ReorderError) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        codes::INVALID_ORDER,
        "ordered_ids must list every current id exactly once",
        Some(err.to_string()),
    )
}

pub(crate) fn pagination_to_api(err: PaginationError) -> ApiError {
    ApiError::invalid_input("Invalid pagination", err.to_string())
}

pub(crate) fn auth_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidCredentials => ApiError::unauthorized("Incorrect username or password"),
        AuthError::InvalidToken => ApiError::unauthorized("Could not validate credentials"),
        AuthError::IncorrectPassword => {
            ApiError::bad_request("Current password is incorrect", None)
        }
        AuthError::WeakPassword | AuthError::BlankUsername => {
            ApiError::invalid_input("Invalid credentials", err.to_string())
        }
        AuthError::UserExists(_) => ApiError::conflict("User already exists", err.to_string()),
        AuthError::Hashing(_) | AuthError::Signing(_) => {
            ApiError::internal("Authentication failed", err.to_string())
        }
        AuthError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn post_to_api(err: AdminPostError) -> ApiError {
    match err {
        AdminPostError::ConstraintViolation(field) => {
            ApiError::invalid_input("Invalid post", field)
        }
        AdminPostError::NotFound => ApiError::not_found("Post not found"),
        AdminPostError::InvalidTags => ApiError::bad_request("One or more tag IDs are invalid", None),
        AdminPostError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn tag_to_api(err: AdminTagError) -> ApiError {
    match err {
        AdminTagError::ConstraintViolation(field) => ApiError::invalid_input("Invalid tag", field),
        AdminTagError::Duplicate { slug } => ApiError::conflict("Tag already exists", slug),
        AdminTagError::NotFound => ApiError::not_found("Tag not found"),
        AdminTagError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn page_to_api(err: AdminPageError) -> ApiError {
    match err {
        AdminPageError::ConstraintViolation(field) => {
            ApiError::invalid_input("Invalid page", field)
        }
        AdminPageError::InvalidSlug(_) => ApiError::invalid_input("Invalid slug", err.to_string()),
        AdminPageError::SlugTaken(slug) => ApiError::conflict("Page slug already exists", slug),
        AdminPageError::NotFound => ApiError::not_found("Page not found"),
        AdminPageError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn nav_to_api(err: AdminNavigationError) -> ApiError {
    match err {
        AdminNavigationError::Target(target) => {
            ApiError::invalid_input("Invalid nav link", target.to_string())
        }
        AdminNavigationError::PageNotFound => ApiError::not_found("Published page not found"),
        AdminNavigationError::AlreadyLinked => {
            ApiError::conflict("Page is already linked", err.to_string())
        }
        AdminNavigationError::NotFound => ApiError::not_found("Nav link not found"),
        AdminNavigationError::Reorder(reorder) => reorder_to_api(reorder),
        AdminNavigationError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn social_to_api(err: AdminSocialError) -> ApiError {
    match err {
        AdminSocialError::ConstraintViolation(field) => {
            ApiError::invalid_input("Invalid social link", field)
        }
        AdminSocialError::NotFound => ApiError::not_found("Social link not found"),
        AdminSocialError::Reorder(reorder) => reorder_to_api(reorder),
        AdminSocialError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn travel_to_api(err: AdminTravelError) -> ApiError {
    match err {
        AdminTravelError::ConstraintViolation(field) => {
            ApiError::invalid_input("Invalid country", field)
        }
        AdminTravelError::Duplicate { .. } => {
            ApiError::conflict("Country already listed", err.to_string())
        }
        AdminTravelError::NotFound => ApiError::not_found("Country not found"),
        AdminTravelError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn profile_to_api(err: AdminProfileError) -> ApiError {
    match err {
        AdminProfileError::UnsupportedImage(_) => ApiError::invalid_input(
            "Unsupported image type",
            "accepted types are image/jpeg, image/png, image/gif and image/webp",
        ),
        AdminProfileError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn upload_storage_to_api(err: UploadStorageError) -> ApiError {
    match err {
        UploadStorageError::Io(_) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::UPLOAD,
            "Failed to store upload",
            Some(err.to_string()),
        ),
        UploadStorageError::PayloadTooLarge { .. } => ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            codes::UPLOAD,
            "Upload too large",
            Some(err.to_string()),
        ),
        _ => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::UPLOAD,
            "Failed to store upload",
            Some(err.to_string()),
        ),
    }
}

pub(crate) fn letterboxd_to_api(err: LetterboxdError) -> ApiError {
    ApiError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        codes::UPSTREAM_UNAVAILABLE,
        "Letterboxd feed unavailable",
        Some(err.0.to_string()),
    )
}

pub(crate) fn rawg_to_api(err: RawgError) -> ApiError {
    if err.is_bad_gateway() {
        return ApiError::new(
            StatusCode::BAD_GATEWAY,
            codes::UPSTREAM_ERROR,
            "RAWG returned an error",
            Some(err.to_string()),
        );
    }

    match err {
        RawgError::NotReferenced(_) => ApiError::not_found("Game not found"),
        RawgError::Repo(repo) => repo_to_api(repo),
        RawgError::Upstream(upstream) => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::UPSTREAM_UNAVAILABLE,
            "RAWG unavailable",
            Some(upstream.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::upstream::UpstreamError;

    #[test]
    fn reorder_mismatch_is_a_bad_request() {
        let err = repo_to_api(RepoError::Reorder(ReorderError::Missing { ids: vec![3] }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), codes::INVALID_ORDER);
    }

    #[test]
    fn rawg_statuses_follow_the_failure_kind() {
        let status = rawg_to_api(RawgError::Upstream(UpstreamError::Status { status: 500 }));
        assert_eq!(status.status(), StatusCode::BAD_GATEWAY);

        let missing_key = rawg_to_api(RawgError::Upstream(UpstreamError::NotConfigured));
        assert_eq!(missing_key.status(), StatusCode::SERVICE_UNAVAILABLE);

        let gated = rawg_to_api(RawgError::NotReferenced("42".into()));
        assert_eq!(gated.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn letterboxd_failures_are_unavailable() {
        let err = letterboxd_to_api(LetterboxdError(UpstreamError::Status { status: 502 }));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn nav_link_conflicts_and_missing_pages() {
        assert_eq!(
            nav_to_api(AdminNavigationError::AlreadyLinked).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            nav_to_api(AdminNavigationError::PageNotFound).status(),
            StatusCode::NOT_FOUND
        );
    }
}
