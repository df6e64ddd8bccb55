//! Context assembly for a chat turn.
//!
//! Relevance is plain substring containment of the whole question. There is
//! no similarity search over the stored embeddings.

use assistant_core::ChatMessage;
use tracing::debug;

/// Only this many trailing history messages are considered.
pub const RECENT_MESSAGES: usize = 5;

/// Upper bound on assembled context, in characters.
pub const MAX_CONTEXT_CHARS: usize = 5000;

/// At most this many matching candidates are kept.
const MAX_MATCHES: usize = 3;

/// Candidates used when nothing matches.
const FALLBACK_CANDIDATES: usize = 2;

const FOLLOW_UP_TRIGGERS: [&str; 3] = ["more", "elaborate", "what about"];

/// Whether a question continues the previous answer.
///
/// Needs a trigger phrase and at least two messages of recent history.
pub fn is_follow_up(question: &str, recent: &[ChatMessage]) -> bool {
    let lower = question.to_lowercase();
    recent.len() >= 2 && FOLLOW_UP_TRIGGERS.iter().any(|t| lower.contains(t))
}

fn recent_window(history: &[ChatMessage]) -> &[ChatMessage] {
    &history[history.len().saturating_sub(RECENT_MESSAGES)..]
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

/// Build the context for one question.
///
/// `texts` are the course's material texts followed by its transcripts.
/// On a follow-up the last assistant reply becomes a candidate and always
/// leads the result. Returns an empty string when there is nothing to draw
/// from.
pub fn assemble_context(question: &str, texts: &[String], history: &[ChatMessage]) -> String {
    let recent = recent_window(history);
    let follow_up = is_follow_up(question, recent);

    let previous = if follow_up {
        recent
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .map(|m| m.content.as_str())
    } else {
        None
    };

    let candidates: Vec<&str> = previous
        .into_iter()
        .chain(texts.iter().map(String::as_str))
        .collect();

    if candidates.is_empty() {
        return String::new();
    }

    let needle = question.to_lowercase();
    let mut selected: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, text)| text.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .take(MAX_MATCHES)
        .collect();

    if selected.is_empty() {
        selected = (0..candidates.len().min(FALLBACK_CANDIDATES)).collect();
    } else if previous.is_some() && selected[0] != 0 {
        selected.insert(0, 0);
        selected.truncate(MAX_MATCHES);
    }

    debug!(
        follow_up,
        candidates = candidates.len(),
        selected = selected.len(),
        "Context assembled"
    );

    let joined = selected
        .iter()
        .map(|&i| candidates[i])
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(joined, MAX_CONTEXT_CHARS)
}
