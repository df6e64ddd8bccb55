//! Error types for responder operations.

use thiserror::Error;

/// Errors that can occur while generating an assistant reply.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The responder is misconfigured (e.g. missing credential).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The hosted service rejected the credential.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The hosted service is throttling requests.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The request could not reach the hosted service.
    #[error("network error: {0}")]
    Network(String),

    /// The reply could not be produced.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

impl AssistantError {
    /// Whether this error means the credential is missing or rejected.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            AssistantError::Configuration(_) | AssistantError::Authentication(_)
        )
    }
}
