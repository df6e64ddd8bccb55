//! Keyword-matching responder for the course assistant.
//!
//! This crate provides the demo-mode strategy the assistant falls back to
//! when no hosted model credential is configured, or when the hosted call
//! fails for a reason other than authentication or throttling:
//! - [`KeywordResponder`] - quotes context sentences sharing a word with the question
//!
//! It is deterministic and never fails, which makes it the reference
//! responder for tests as well.
//!
//! # Example
//!
//! ```rust
//! use keyword_assistant::{AssistantRequest, KeywordResponder, Responder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keyword_assistant::AssistantError> {
//!     let responder = KeywordResponder::new();
//!
//!     let request = AssistantRequest::new(
//!         "What is JavaScript?",
//!         "JavaScript is a scripting language. CSS styles pages.",
//!     );
//!
//!     let reply = responder.respond(request).await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

mod keyword;

pub use assistant_core::{
    async_trait, AssistantError, AssistantReply, AssistantRequest, Responder,
};

pub use keyword::{
    keyword_reply, split_sentences, KeywordResponder, DEMO_MODE_NOTE, NOT_ENOUGH_INFORMATION,
};
