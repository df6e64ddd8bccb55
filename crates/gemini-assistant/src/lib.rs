//! Google Gemini-based responder implementation.
//!
//! This crate provides a [`Responder`] that sends one `generateContent`
//! request per question, instructing the model to answer only from the
//! supplied course material.
//!
//! # Features
//!
//! - Fixed grounding instruction wrapping the course material
//! - Typed errors for missing/rejected credentials and rate limiting
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use gemini_assistant::{AssistantRequest, GeminiResponder, Responder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let responder = GeminiResponder::from_env()?;
//!     let reply = responder
//!         .respond(AssistantRequest::new("What is a closure?", "A closure captures its environment."))
//!         .await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod responder;

pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use responder::{build_instruction, build_question, GeminiResponder};

// Re-export assistant-core types for convenience
pub use assistant_core::{
    async_trait, AssistantError, AssistantReply, AssistantRequest, Responder,
};
