//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use course_service::{AuthError, ServiceError};
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Service layer error.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Database error outside the service layer.
    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
                ServiceError::Auth(AuthError::EmailInUse(_)) => StatusCode::CONFLICT,
                ServiceError::Auth(AuthError::Provider(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                ServiceError::Auth(_) => StatusCode::BAD_REQUEST,
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Storage(_) | ServiceError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
