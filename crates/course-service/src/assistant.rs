//! Course-scoped chat assistant.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use assistant_core::{ChatMessage, ConversationHistory};
use database::{course, embedding, interaction, material, Database, EmbeddingKind, MaterialType};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::context::assemble_context;
use crate::error::Result;
use crate::generator::ResponseGenerator;
use crate::training::{train_course, TrainingItem, TrainingReport};

/// Reply for a course whose assistant has not been prepared.
pub const NOT_LOADED_REPLY: &str =
    "Please ensure the course is loaded and AI assistant is trained with materials.";

/// Reply when course text could not be read for a turn.
pub const PROCESSING_ERROR_REPLY: &str =
    "I'm sorry, I encountered an error while processing your question. Please try again later.";

/// Chat assistant over every course's uploaded materials.
///
/// A course must be prepared with [`CourseAssistant::prepare`] before it
/// answers. Sessions are keyed by course and caller-chosen session id.
pub struct CourseAssistant {
    db: Database,
    generator: ResponseGenerator,
    history: ConversationHistory,
    prepared: RwLock<HashSet<String>>,
    /// One lock per course so concurrent prepares train it only once.
    training: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CourseAssistant {
    pub fn new(db: Database, generator: ResponseGenerator) -> Self {
        Self::with_history(db, generator, ConversationHistory::default())
    }

    pub fn with_history(
        db: Database,
        generator: ResponseGenerator,
        history: ConversationHistory,
    ) -> Self {
        Self {
            db,
            generator,
            history,
            prepared: RwLock::new(HashSet::new()),
            training: Mutex::new(HashMap::new()),
        }
    }

    /// Texts the assistant can draw on, materials before transcripts.
    ///
    /// Falls back to the course's stored transcript prompt when no material
    /// documents were uploaded for it.
    async fn course_documents(&self, course_id: &str) -> Result<Vec<TrainingItem>> {
        let records = material::list_materials(self.db.pool(), course_id).await?;

        if records.is_empty() {
            return match course::get_course(self.db.pool(), course_id).await {
                Ok(course) => Ok(course
                    .ai_system_prompt
                    .filter(|prompt| !prompt.trim().is_empty())
                    .map(|prompt| vec![TrainingItem::new(prompt, EmbeddingKind::Transcript)])
                    .unwrap_or_default()),
                Err(database::DatabaseError::NotFound { .. }) => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            };
        }

        let (transcripts, others): (Vec<_>, Vec<_>) = records
            .into_iter()
            .filter(|record| !record.content.trim().is_empty())
            .partition(|record| record.material_type == MaterialType::Transcript);

        let mut seen = HashSet::new();
        let items = others
            .into_iter()
            .map(|record| TrainingItem::new(record.content, EmbeddingKind::Material))
            .chain(
                transcripts
                    .into_iter()
                    .map(|record| TrainingItem::new(record.content, EmbeddingKind::Transcript)),
            )
            .filter(|item| seen.insert(item.content.clone()))
            .collect();

        Ok(items)
    }

    /// Make a course's assistant ready to answer.
    ///
    /// Existing embeddings are reused; otherwise the course's texts are
    /// embedded. A course without any usable text stays unprepared.
    pub async fn prepare(&self, course_id: &str) -> Result<TrainingReport> {
        let course_lock = self
            .training
            .lock()
            .await
            .entry(course_id.to_string())
            .or_default()
            .clone();
        let _training = course_lock.lock().await;

        let existing = embedding::count_embeddings(self.db.pool(), course_id).await?;

        let report = if existing > 0 {
            debug!(course_id, existing, "Reusing stored embeddings");
            TrainingReport {
                embedding_count: existing as usize,
                reused: true,
                failures: Vec::new(),
            }
        } else {
            let items = self.course_documents(course_id).await?;
            train_course(&self.db, course_id, &items).await?
        };

        let mut prepared = self.prepared.write().await;
        if report.is_ready() {
            prepared.insert(course_id.to_string());
            info!(course_id, embeddings = report.embedding_count, "Course assistant ready");
        } else {
            prepared.remove(course_id);
            warn!(course_id, "No training material found for course");
        }

        Ok(report)
    }

    pub async fn is_prepared(&self, course_id: &str) -> bool {
        self.prepared.read().await.contains(course_id)
    }

    /// Answer one question. Never fails; problems become reply text.
    pub async fn ask(
        &self,
        course_id: &str,
        session: &str,
        user_id: Option<&str>,
        question: &str,
    ) -> String {
        if !self.is_prepared(course_id).await {
            return NOT_LOADED_REPLY.to_string();
        }

        let key = session_key(course_id, session);
        let history = self.history.get(&key).await;

        let texts: Vec<String> = match self.course_documents(course_id).await {
            Ok(items) => items.into_iter().map(|item| item.content).collect(),
            Err(e) => {
                warn!(course_id, error = %e, "Failed to load course text");
                return PROCESSING_ERROR_REPLY.to_string();
            }
        };

        let context = assemble_context(question, &texts, &history);
        let reply = self.generator.generate(question, &context).await;

        self.history.add_exchange(&key, question, &reply).await;

        if let Err(e) =
            interaction::log_interaction(self.db.pool(), course_id, user_id, question, &reply).await
        {
            warn!(course_id, error = %e, "Failed to log chat interaction");
        }

        reply
    }

    /// The session's transcript, oldest first.
    pub async fn history(&self, course_id: &str, session: &str) -> Vec<ChatMessage> {
        self.history.get(&session_key(course_id, session)).await
    }

    /// Forget a session's transcript.
    pub async fn clear_history(&self, course_id: &str, session: &str) {
        self.history.clear(&session_key(course_id, session)).await;
    }

    /// Counts of logged interactions per user for a course, most active first.
    pub async fn interaction_summary(
        &self,
        course_id: &str,
        limit: i64,
    ) -> Result<Vec<(Option<String>, usize)>> {
        let logged = interaction::list_interactions(self.db.pool(), course_id, limit).await?;

        let mut counts: HashMap<Option<String>, usize> = HashMap::new();
        for entry in logged {
            *counts.entry(entry.user_id).or_default() += 1;
        }

        let mut summary: Vec<_> = counts.into_iter().collect();
        summary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(summary)
    }
}

fn session_key(course_id: &str, session: &str) -> String {
    format!("{}:{}", course_id, session)
}
