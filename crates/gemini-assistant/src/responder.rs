//! GeminiResponder implementation using the Gemini REST API.

use assistant_core::{
    async_trait, AssistantError, AssistantReply, AssistantRequest, Responder,
};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::config::GeminiConfig;

/// Reply used when the model returns no text.
const EMPTY_COMPLETION_REPLY: &str = "I apologize, but I couldn't generate a response.";

/// A responder that asks a hosted Gemini model to answer from course material.
///
/// Each question is a single stateless request: the course material travels
/// in the system instruction and the question in the only user turn.
pub struct GeminiResponder {
    client: Client,
    config: GeminiConfig,
}

impl GeminiResponder {
    /// Create a new GeminiResponder with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AssistantError> {
        if config.api_key.trim().is_empty() {
            return Err(AssistantError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            AssistantError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("GeminiResponder initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiResponder from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AssistantError> {
        let url = self.config.generate_url();

        debug!("Sending request to Gemini API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            return Err(classify_failure(status, &message));
        }

        response.json().await.map_err(|e| {
            AssistantError::ProcessingFailed(format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl Responder for GeminiResponder {
    async fn respond(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
        let body = GenerateContentRequest {
            system_instruction: Content::instruction(build_instruction(&request.context)),
            contents: vec![Content::user(build_question(&request.question))],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        };

        let completion = self.generate(body).await?;

        if let Some(usage) = &completion.usage_metadata {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        let text = completion.first_text().unwrap_or_else(|| {
            warn!("No content in Gemini response, using default");
            EMPTY_COMPLETION_REPLY.to_string()
        });

        Ok(AssistantReply::new(text))
    }

    fn name(&self) -> &str {
        "GeminiResponder"
    }
}

/// Wrap course material in the grounding instruction.
pub fn build_instruction(material: &str) -> String {
    format!(
        "You are an educational AI assistant dedicated to helping students with course content.\n\
         ONLY answer based on the following course material. If you don't know the answer based on this content, say so.\n\
         Do not make up information that isn't present in the provided materials.\n\
         \n\
         COURSE MATERIAL:\n{}",
        material
    )
}

/// Format the user turn for a question.
pub fn build_question(question: &str) -> String {
    format!(
        "Question: {}\nAnswer (based only on the provided course material):",
        question
    )
}

/// Map a failed HTTP exchange onto the assistant error taxonomy.
fn classify_failure(status: StatusCode, message: &str) -> AssistantError {
    let lower = message.to_lowercase();
    let detail = format!("API error ({}): {}", status.as_u16(), message);

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || lower.contains("api key")
    {
        AssistantError::Authentication(detail)
    } else if status == StatusCode::TOO_MANY_REQUESTS || lower.contains("rate limit") {
        AssistantError::RateLimited(detail)
    } else {
        AssistantError::ProcessingFailed(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_key() {
        let result = GeminiResponder::new(GeminiConfig::default());
        assert!(matches!(result, Err(AssistantError::Configuration(_))));
    }

    #[test]
    fn test_responder_name() {
        let config = GeminiConfig::builder().api_key("test-key").build();
        let responder = GeminiResponder::new(config).unwrap();
        assert_eq!(responder.name(), "GeminiResponder");
        assert_eq!(responder.config().api_key, "test-key");
    }

    #[test]
    fn test_instruction_wraps_material() {
        let instruction = build_instruction("Closures capture variables.");
        assert!(instruction.contains("ONLY answer based on the following course material"));
        assert!(instruction.ends_with("COURSE MATERIAL:\nClosures capture variables."));

        let question = build_question("What is a closure?");
        assert!(question.starts_with("Question: What is a closure?\n"));
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, "API key not valid. Please pass a valid API key."),
            AssistantError::Authentication(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::FORBIDDEN, "denied"),
            AssistantError::Authentication(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, "Resource has been exhausted"),
            AssistantError::RateLimited(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            AssistantError::ProcessingFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = GeminiConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:9")
            .build();
        let responder = GeminiResponder::new(config).unwrap();

        let result = responder
            .respond(AssistantRequest::new("q", "context"))
            .await;
        assert!(matches!(result, Err(AssistantError::Network(_))));
    }
}
