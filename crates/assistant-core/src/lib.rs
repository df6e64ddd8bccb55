//! Core trait and types for course assistant responders.
//!
//! This crate provides the shared interface for every response strategy the
//! course assistant can use. It defines:
//!
//! - [`Responder`] - The trait that all response strategies implement
//! - [`AssistantRequest`] / [`AssistantReply`] - Input and output of a single turn
//! - [`AssistantError`] - Error types for responder operations
//! - [`ChatMessage`] / [`ConversationHistory`] - Per-session chat transcripts
//!
//! # Example
//!
//! ```rust
//! use assistant_core::{async_trait, AssistantError, AssistantReply, AssistantRequest, Responder};
//!
//! struct Parrot;
//!
//! #[async_trait]
//! impl Responder for Parrot {
//!     async fn respond(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
//!         Ok(AssistantReply::new(request.question))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Parrot"
//!     }
//! }
//! ```

mod error;
mod history;
mod message;
mod prompt;
mod trait_def;

pub use error::AssistantError;
pub use history::{ConversationHistory, DEFAULT_MAX_SESSIONS};
pub use message::{AssistantReply, AssistantRequest, ChatMessage, ChatRole};
pub use prompt::hash_prompt;
pub use trait_def::Responder;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
