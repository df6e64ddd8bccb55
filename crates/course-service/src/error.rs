//! Error types for course service operations.

use database::DatabaseError;
use storage::StorageError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::creation::CourseValidationError;

/// Errors that can occur in catalog, creation and account operations.
///
/// Chat turns never produce these; they degrade to apology replies instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A creation step failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] CourseValidationError),

    /// Identity provider or account error.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// The caller may not perform this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Requested record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Material upload failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Any other persistence failure.
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            other => ServiceError::Database(other),
        }
    }
}

/// Result type for course service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
