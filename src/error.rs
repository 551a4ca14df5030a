use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure taxonomy for the HTTP surface. Every handler error is one of
/// these; clients always receive a `{"message": "..."}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    DuplicateUser,

    #[error("Insufficient credits")]
    InsufficientCredits,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    NotFound(&'static str),

    /// Zero rows matched a combined `id AND user_id` filter. The row may
    /// not exist or may belong to another user; callers cannot tell which.
    #[error("{0}")]
    NotFoundOrUnauthorized(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, (*msg).to_string()),
            ApiError::InvalidCredentials
            | ApiError::DuplicateUser
            | ApiError::InsufficientCredits => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::AuthRequired | ApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::NotFound(msg) | ApiError::NotFoundOrUnauthorized(msg) => {
                (StatusCode::NOT_FOUND, (*msg).to_string())
            }
            ApiError::Database(e) => {
                error!(error = %e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let res = ApiError::Validation("Invalid amount").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn insufficient_credits_maps_to_bad_request() {
        let res = ApiError::InsufficientCredits.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        assert_eq!(
            ApiError::AuthRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn ownership_miss_maps_to_not_found() {
        let res = ApiError::NotFoundOrUnauthorized("Skill not found").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_hide_detail() {
        let res = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
