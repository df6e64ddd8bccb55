//! Marketplace statistics.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Marketplace statistics.
#[derive(Clone, Serialize)]
pub struct Stats {
    pub course_count: i64,
    pub student_count: i64,
    pub tutor_count: i64,
    pub categories: Vec<String>,
}

/// Get marketplace statistics as JSON.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<Stats>> {
    let pool = state.db.pool();

    let course_count = database::course::count_courses(pool).await?;
    let by_role = database::user::count_users_by_role(pool).await?;
    let categories = state.catalog.categories().await?;

    let count_for = |role: &str| {
        by_role
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };

    Ok(Json(Stats {
        course_count,
        student_count: count_for("student"),
        tutor_count: count_for("tutor"),
        categories,
    }))
}
