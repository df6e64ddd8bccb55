//! Chat interaction log.

use sqlx::SqlitePool;

use crate::models::ChatInteraction;
use crate::Result;

/// Log a question and the reply it received.
pub async fn log_interaction(
    pool: &SqlitePool,
    course_id: &str,
    user_id: Option<&str>,
    question: &str,
    response: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_interactions (course_id, user_id, question, response)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .bind(question)
    .bind(response)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the most recent interactions for a course, newest first.
pub async fn list_interactions(
    pool: &SqlitePool,
    course_id: &str,
    limit: i64,
) -> Result<Vec<ChatInteraction>> {
    let rows = sqlx::query_as::<_, ChatInteraction>(
        r#"
        SELECT id, course_id, user_id, question, response, created_at
        FROM chat_interactions
        WHERE course_id = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(course_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
