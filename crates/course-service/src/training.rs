//! Assistant training with stub embeddings.
//!
//! Vectors are random. They are stored so a course counts as trained, but
//! nothing searches them.

use assistant_core::hash_prompt;
use database::{course_model, embedding, Database, EmbeddingKind};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;

/// Dimensions of a stub embedding vector.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Model name recorded for stub training runs.
pub const STUB_MODEL_NAME: &str = "mock-embedding-1536";

/// One piece of course text to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingItem {
    pub content: String,
    pub kind: EmbeddingKind,
}

impl TrainingItem {
    pub fn new(content: impl Into<String>, kind: EmbeddingKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }
}

/// An item whose embedding could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingFailure {
    /// Position in the submitted item list.
    pub index: usize,
    pub error: String,
}

/// Outcome of preparing a course assistant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrainingReport {
    /// Embeddings now available for the course.
    pub embedding_count: usize,
    /// Whether earlier embeddings were reused instead of training.
    pub reused: bool,
    pub failures: Vec<TrainingFailure>,
}

impl TrainingReport {
    /// A course is ready once it has at least one embedding.
    pub fn is_ready(&self) -> bool {
        self.embedding_count > 0
    }
}

/// Generate a random stand-in embedding in `[0, 1)`.
pub fn stub_embedding() -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..EMBEDDING_DIMENSIONS).map(|_| rng.gen::<f32>()).collect()
}

/// Embed and store each non-empty item, then record the run.
///
/// Items are stored one at a time. A failed insert is recorded in the report
/// and does not stop the remaining items. The run record is written only
/// when at least one embedding landed.
pub async fn train_course(
    db: &Database,
    course_id: &str,
    items: &[TrainingItem],
) -> Result<TrainingReport> {
    let mut report = TrainingReport::default();

    for (index, item) in items.iter().enumerate() {
        if item.content.trim().is_empty() {
            continue;
        }

        let vector = stub_embedding();
        match embedding::insert_embedding(db.pool(), course_id, &item.content, &vector, item.kind)
            .await
        {
            Ok(_) => report.embedding_count += 1,
            Err(e) => {
                warn!(course_id, index, error = %e, "Failed to store embedding");
                report.failures.push(TrainingFailure {
                    index,
                    error: e.to_string(),
                });
            }
        }
    }

    if report.is_ready() {
        let corpus: Vec<&str> = items.iter().map(|item| item.content.as_str()).collect();
        let prompt_hash = hash_prompt(&corpus.join("\n\n"));
        course_model::insert_course_model(
            db.pool(),
            course_id,
            STUB_MODEL_NAME,
            Some(&prompt_hash),
            report.embedding_count as i64,
        )
        .await?;
    }

    info!(
        course_id,
        embeddings = report.embedding_count,
        failures = report.failures.len(),
        "Course assistant training finished"
    );

    Ok(report)
}
