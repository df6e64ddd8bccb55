//! Response generation: hosted model with keyword fallback.

use std::sync::Arc;

use assistant_core::{AssistantError, AssistantRequest, Responder};
use gemini_assistant::GeminiResponder;
use keyword_assistant::{keyword_reply, KeywordResponder};
use tracing::{info, warn};

/// Reply when the hosted model rejects or lacks its credential.
pub const CREDENTIAL_APOLOGY: &str =
    "The AI assistant couldn't authenticate. There may be an issue with the API key configuration.";

/// Reply when the hosted model is throttling requests.
pub const HIGH_DEMAND_APOLOGY: &str = "The AI service is currently experiencing high demand. Please try your question again in a few minutes.";

/// Reply when there is no course text to ground a hosted answer in.
pub const NO_CONTEXT_APOLOGY: &str = "I apologize, but I couldn't find a specific answer to your question in the course materials. Could you please rephrase your question or ask about a different topic?";

/// Appended to the keyword reply when the hosted call failed.
pub const FALLBACK_NOTE: &str =
    "\n\n(Note: Using fallback mode due to an error connecting to the AI service)";

/// Which strategy a generator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Hosted,
    Mock,
}

enum Strategy {
    Hosted(Arc<dyn Responder>),
    Mock(KeywordResponder),
}

/// Turns a question and its assembled context into reply text.
///
/// The strategy is fixed at construction. [`ResponseGenerator::generate`]
/// never fails; every error becomes a reply string.
pub struct ResponseGenerator {
    strategy: Strategy,
}

impl ResponseGenerator {
    /// Use the hosted model when `GEMINI_API_KEY` is configured, otherwise
    /// keyword matching.
    pub fn from_env() -> Self {
        match GeminiResponder::from_env() {
            Ok(responder) => {
                info!(model = %responder.config().model, "Using hosted response generation");
                Self::hosted(Arc::new(responder))
            }
            Err(e) => {
                info!(reason = %e, "Hosted model not configured, using keyword responses");
                Self::mock()
            }
        }
    }

    /// Generate with an arbitrary hosted responder.
    pub fn hosted(responder: Arc<dyn Responder>) -> Self {
        Self {
            strategy: Strategy::Hosted(responder),
        }
    }

    /// Generate with keyword matching only.
    pub fn mock() -> Self {
        Self {
            strategy: Strategy::Mock(KeywordResponder::new()),
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self.strategy {
            Strategy::Hosted(_) => GenerationMode::Hosted,
            Strategy::Mock(_) => GenerationMode::Mock,
        }
    }

    /// Produce reply text for one turn.
    pub async fn generate(&self, question: &str, context: &str) -> String {
        let request = AssistantRequest::new(question, context);

        match &self.strategy {
            Strategy::Mock(responder) => match responder.respond(request).await {
                Ok(reply) => reply.text,
                Err(_) => keyword_reply(question, context),
            },
            Strategy::Hosted(responder) => {
                if !request.has_context() {
                    return NO_CONTEXT_APOLOGY.to_string();
                }

                match responder.respond(request).await {
                    Ok(reply) => reply.text,
                    Err(e) => degrade(&e, question, context, responder.name()),
                }
            }
        }
    }
}

fn degrade(error: &AssistantError, question: &str, context: &str, responder: &str) -> String {
    warn!(responder, error = %error, "Hosted generation failed");

    if error.is_credential_error() {
        return CREDENTIAL_APOLOGY.to_string();
    }

    if matches!(error, AssistantError::RateLimited(_)) {
        return HIGH_DEMAND_APOLOGY.to_string();
    }

    format!("{}{}", keyword_reply(question, context), FALLBACK_NOTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{async_trait, AssistantReply};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        result: fn() -> Result<AssistantReply, AssistantError>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(result: fn() -> Result<AssistantReply, AssistantError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Responder for Scripted {
        async fn respond(
            &self,
            _request: AssistantRequest,
        ) -> Result<AssistantReply, AssistantError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    const CONTEXT: &str = "JavaScript runs in browsers. CSS styles pages.";

    #[tokio::test]
    async fn test_hosted_reply_is_returned_verbatim() {
        let generator =
            ResponseGenerator::hosted(Scripted::new(|| Ok(AssistantReply::new("Grounded answer"))));
        assert_eq!(generator.mode(), GenerationMode::Hosted);
        assert_eq!(generator.generate("q", CONTEXT).await, "Grounded answer");
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let auth = ResponseGenerator::hosted(Scripted::new(|| {
            Err(AssistantError::Authentication("bad key".to_string()))
        }));
        assert_eq!(auth.generate("q", CONTEXT).await, CREDENTIAL_APOLOGY);

        let throttled = ResponseGenerator::hosted(Scripted::new(|| {
            Err(AssistantError::RateLimited("429".to_string()))
        }));
        assert_eq!(throttled.generate("q", CONTEXT).await, HIGH_DEMAND_APOLOGY);

        let broken = ResponseGenerator::hosted(Scripted::new(|| {
            Err(AssistantError::Network("connection reset".to_string()))
        }));
        let reply = broken.generate("Where does JavaScript run?", CONTEXT).await;
        assert!(reply.contains("JavaScript runs in browsers"));
        assert!(reply.ends_with(FALLBACK_NOTE));
    }

    #[tokio::test]
    async fn test_hosted_without_context_skips_the_call() {
        let scripted = Scripted::new(|| Ok(AssistantReply::new("unused")));
        let generator = ResponseGenerator::hosted(scripted.clone());

        assert_eq!(generator.generate("q", "   ").await, NO_CONTEXT_APOLOGY);
        assert_eq!(scripted.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mock_mode_is_keyword_matching() {
        let generator = ResponseGenerator::mock();
        assert_eq!(generator.mode(), GenerationMode::Mock);

        let reply = generator.generate("What is JavaScript?", CONTEXT).await;
        assert_eq!(reply, keyword_reply("What is JavaScript?", CONTEXT));
    }
}
