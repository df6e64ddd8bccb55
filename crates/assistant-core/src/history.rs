//! Conversation history management.
//!
//! Each chat session (one learner talking to one course assistant) keeps its
//! own transcript. Transcripts are trimmed to a turn budget and whole sessions
//! are evicted least-recently-used first so abandoned sessions cannot grow
//! memory without bound.

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::message::ChatMessage;

/// Default maximum number of sessions to track before LRU eviction.
pub const DEFAULT_MAX_SESSIONS: usize = 10000;

/// Per-session conversation history with LRU eviction.
///
/// # Example
///
/// ```rust
/// use assistant_core::ConversationHistory;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let history = ConversationHistory::new(5); // Keep 5 turns
///
///     history.add_exchange("course_1:tab-a", "What is HTML?", "A markup language.").await;
///
///     let messages = history.get("course_1:tab-a").await;
///     assert_eq!(messages.len(), 2);
/// }
/// ```
#[derive(Debug)]
pub struct ConversationHistory {
    /// Insertion order doubles as recency order for eviction.
    sessions: RwLock<IndexMap<String, Vec<ChatMessage>>>,
    /// Maximum number of turns (user + assistant pairs) kept per session.
    max_turns: usize,
    max_sessions: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ConversationHistory {
    /// Create a new conversation history with the given max turns.
    pub fn new(max_turns: usize) -> Self {
        Self::with_limits(max_turns, DEFAULT_MAX_SESSIONS)
    }

    /// Create a new conversation history with custom limits.
    ///
    /// # Arguments
    ///
    /// * `max_turns` - Maximum number of turns (user + assistant pairs) per session
    /// * `max_sessions` - Maximum number of sessions to track before LRU eviction
    pub fn with_limits(max_turns: usize, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(IndexMap::new()),
            max_turns,
            max_sessions,
        }
    }

    /// Get the transcript for a session, oldest first.
    ///
    /// This marks the session as recently used.
    pub async fn get(&self, session: &str) -> Vec<ChatMessage> {
        let mut sessions = self.sessions.write().await;

        if let Some(entry) = sessions.shift_remove(session) {
            let result = entry.clone();
            sessions.insert(session.to_string(), entry);
            result
        } else {
            Vec::new()
        }
    }

    /// Append a question and its answer to the session.
    pub async fn add_exchange(&self, session: &str, question: &str, answer: &str) {
        let mut sessions = self.sessions.write().await;

        let mut history = sessions.shift_remove(session).unwrap_or_default();

        history.push(ChatMessage::user(question));
        history.push(ChatMessage::assistant(answer));

        let max_messages = self.max_turns * 2;
        if history.len() > max_messages {
            let to_remove = history.len() - max_messages;
            history.drain(0..to_remove);
        }

        sessions.insert(session.to_string(), history);

        while sessions.len() > self.max_sessions {
            sessions.shift_remove_index(0);
        }
    }

    /// Clear history for a specific session.
    pub async fn clear(&self, session: &str) {
        self.sessions.write().await.shift_remove(session);
    }

    /// Get the current number of tracked sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
