use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::application::auth::AuthError;

use super::error::ApiError;
use super::handlers::auth_to_api;
use super::state::ApiState;

/// Resolve the bearer token to an admin before any admin handler runs.
pub async fn admin_auth(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers().get(header::AUTHORIZATION)) else {
        return ApiError::unauthorized("Not authenticated").into_response();
    };

    let identity = match state.auth.authenticate(&token).await {
        Ok(identity) => identity,
        Err(AuthError::InvalidToken) => {
            debug!(target = "folio::http::auth", "rejected bearer token");
            return ApiError::unauthorized("Could not validate credentials").into_response();
        }
        Err(err) => return auth_to_api(err).into_response(),
    };

    request.extensions_mut().insert(identity.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(identity);
    response
}

fn extract_token(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let value = HeaderValue::from_static("bearer abc.def");
        assert_eq!(extract_token(Some(&value)).as_deref(), Some("abc.def"));
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_ignored() {
        assert!(extract_token(Some(&HeaderValue::from_static("Basic abc"))).is_none());
        assert!(extract_token(Some(&HeaderValue::from_static("Bearer   "))).is_none());
        assert!(extract_token(None).is_none());
    }
}
