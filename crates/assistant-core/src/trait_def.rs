//! The Responder trait definition.

use async_trait::async_trait;

use crate::error::AssistantError;
use crate::message::{AssistantReply, AssistantRequest};

/// A strategy that turns a question plus course context into reply text.
///
/// Implementations range from the keyword matcher to a hosted generative
/// model. This trait is object-safe and can be used with `Box<dyn Responder>`.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply for one question.
    ///
    /// A single attempt is made; callers decide how to degrade on error.
    async fn respond(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError>;

    /// Get a human-readable name for this responder.
    fn name(&self) -> &str;

    /// Check if the responder is ready to answer.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
