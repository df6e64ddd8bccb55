//! Stub embedding persistence.
//!
//! Vectors are stored as JSON arrays. Nothing queries them for similarity;
//! the only reader checks whether a course already has embeddings.

use sqlx::{FromRow, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{EmbeddingKind, EmbeddingRecord};

#[derive(FromRow)]
struct EmbeddingRow {
    id: i64,
    course_id: String,
    content: String,
    vector: String,
    kind: String,
    created_at: String,
}

impl TryFrom<EmbeddingRow> for EmbeddingRecord {
    type Error = DatabaseError;

    fn try_from(row: EmbeddingRow) -> Result<Self> {
        Ok(EmbeddingRecord {
            id: row.id,
            course_id: row.course_id,
            content: row.content,
            vector: serde_json::from_str(&row.vector)?,
            kind: row.kind.parse()?,
            created_at: row.created_at,
        })
    }
}

/// Insert one embedding, returning its row id.
pub async fn insert_embedding(
    pool: &SqlitePool,
    course_id: &str,
    content: &str,
    vector: &[f32],
    kind: EmbeddingKind,
) -> Result<i64> {
    let vector = serde_json::to_string(vector)?;

    let result = sqlx::query(
        r#"
        INSERT INTO course_embeddings (course_id, content, vector, kind)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(course_id)
    .bind(content)
    .bind(vector)
    .bind(kind.as_str())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// List the embeddings of a course.
pub async fn list_embeddings(pool: &SqlitePool, course_id: &str) -> Result<Vec<EmbeddingRecord>> {
    let rows = sqlx::query_as::<_, EmbeddingRow>(
        r#"
        SELECT id, course_id, content, vector, kind, created_at
        FROM course_embeddings
        WHERE course_id = ?
        ORDER BY id
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(EmbeddingRecord::try_from).collect()
}

/// Count the embeddings of a course.
pub async fn count_embeddings(pool: &SqlitePool, course_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM course_embeddings WHERE course_id = ?
        "#,
    )
    .bind(course_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
