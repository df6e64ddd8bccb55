//! Keyword responder implementation - quotes matching context sentences.

use async_trait::async_trait;
use tracing::debug;

use assistant_core::{AssistantError, AssistantReply, AssistantRequest, Responder};

/// Disclaimer appended to every reply that quotes course material.
pub const DEMO_MODE_NOTE: &str = "Note: This is demo mode. The AI assistant is using a simple keyword matching system instead of the full hosted model.";

/// Reply used when no sentence of the context shares a word with the question.
pub const NOT_ENOUGH_INFORMATION: &str = "I don't have enough information in the course materials to answer that question specifically.\n\nNote: This is demo mode.";

/// Question words this short or shorter are ignored.
const MIN_WORD_CHARS: usize = 4;

/// A responder that answers by quoting context sentences.
///
/// A sentence is kept when it contains, case-insensitively, any question word
/// of at least four characters. There is no scoring; sentences keep their
/// order in the context.
#[derive(Debug, Clone, Default)]
pub struct KeywordResponder;

impl KeywordResponder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Responder for KeywordResponder {
    async fn respond(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
        Ok(AssistantReply::new(keyword_reply(
            &request.question,
            &request.context,
        )))
    }

    fn name(&self) -> &str {
        "KeywordResponder"
    }
}

/// Split text into trimmed, non-empty sentences on `.`, `!` and `?`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build the keyword-mode reply for a question against a context.
pub fn keyword_reply(question: &str, context: &str) -> String {
    let question = question.to_lowercase();
    let words: Vec<&str> = question
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect();

    let relevant: Vec<&str> = split_sentences(context)
        .into_iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            words.iter().any(|word| lower.contains(word))
        })
        .collect();

    debug!(
        words = words.len(),
        matches = relevant.len(),
        "Keyword reply assembled"
    );

    if relevant.is_empty() {
        return NOT_ENOUGH_INFORMATION.to_string();
    }

    format!(
        "Based on the course materials, I found this information that might help: \"{}\"\n\n{}",
        relevant.join(". "),
        DEMO_MODE_NOTE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "JavaScript is the language of the web. \
        CSS controls layout! Functions in JavaScript are first-class values? \
        HTML describes structure.";

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("One. Two!  Three?...Four");
        assert_eq!(sentences, vec!["One", "Two", "Three", "Four"]);
        assert!(split_sentences("  ...  ").is_empty());
    }

    #[test]
    fn test_quotes_matching_sentences_in_order() {
        let reply = keyword_reply("Explain javascript functions", CONTEXT);

        assert!(reply.starts_with("Based on the course materials"));
        assert!(reply.contains(
            "\"JavaScript is the language of the web. Functions in JavaScript are first-class values\""
        ));
        assert!(reply.ends_with(DEMO_MODE_NOTE));
        assert!(!reply.contains("CSS"));
    }

    #[test]
    fn test_question_punctuation_is_ignored() {
        let reply = keyword_reply("What is JavaScript?", CONTEXT);
        assert!(reply.contains("JavaScript is the language of the web"));
    }

    #[test]
    fn test_short_words_do_not_match() {
        // "is", "the" and "web" are all under four characters
        let reply = keyword_reply("is the web", CONTEXT);
        assert_eq!(reply, NOT_ENOUGH_INFORMATION);
    }

    #[test]
    fn test_empty_context() {
        let reply = keyword_reply("What is JavaScript?", "");
        assert_eq!(reply, NOT_ENOUGH_INFORMATION);
    }

    #[tokio::test]
    async fn test_responder_never_fails() {
        let responder = KeywordResponder::new();
        let reply = responder
            .respond(AssistantRequest::new("Tell me about recursion", CONTEXT))
            .await
            .unwrap();

        assert_eq!(reply.text, NOT_ENOUGH_INFORMATION);
        assert_eq!(responder.name(), "KeywordResponder");
        assert!(responder.is_ready().await);
    }
}
