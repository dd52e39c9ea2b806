use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Business errors the handlers can return. Each maps to a fixed status
/// code; the boundary never exposes internal error details to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("email is already registered")]
    DuplicateEmail,

    // One message for unknown user and wrong password; callers must not be
    // able to tell which check failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("access to this account is forbidden")]
    Forbidden,

    #[error("account {0} does not exist")]
    NotFound(i64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::DuplicateUsername
            | ApiError::DuplicateEmail
            | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(err) => {
                error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn duplicate_and_credential_errors_are_bad_request() {
        assert_eq!(status_of(ApiError::DuplicateUsername), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::DuplicateEmail), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::InvalidCredentials), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(status_of(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_and_internal() {
        assert_eq!(status_of(ApiError::NotFound(7)), StatusCode::NOT_FOUND);
        let err = ApiError::Internal(anyhow::anyhow!("pool exhausted"));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
