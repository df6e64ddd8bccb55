//! Records of finished assistant training runs.

use sqlx::SqlitePool;

use crate::models::CourseModelRecord;
use crate::Result;

/// Record a training run for a course.
pub async fn insert_course_model(
    pool: &SqlitePool,
    course_id: &str,
    model_name: &str,
    prompt_hash: Option<&str>,
    embedding_count: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO course_models (course_id, model_name, prompt_hash, embedding_count)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(course_id)
    .bind(model_name)
    .bind(prompt_hash)
    .bind(embedding_count)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the latest training record for a course, if any.
pub async fn latest_course_model(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Option<CourseModelRecord>> {
    let row = sqlx::query_as::<_, CourseModelRecord>(
        r#"
        SELECT id, course_id, model_name, prompt_hash, embedding_count, created_at
        FROM course_models
        WHERE course_id = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
