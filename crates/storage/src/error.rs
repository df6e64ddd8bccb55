//! Storage error types.

use thiserror::Error;

/// Errors that can occur while storing objects or material documents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The object landed but its material document could not be written.
    #[error("Material record error: {0}")]
    Database(#[from] database::DatabaseError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
