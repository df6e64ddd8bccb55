//! Course assistant routes.

use assistant_core::ChatMessage;
use axum::extract::{Path, State};
use axum::Json;
use course_service::TrainingReport;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session: String,
    pub question: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Chat reply.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Outcome of preparing a course's assistant.
#[derive(Debug, Serialize)]
pub struct PrepareReply {
    pub ready: bool,
    #[serde(flatten)]
    pub report: TrainingReport,
}

/// Prepare the assistant for a course.
pub async fn prepare(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PrepareReply>> {
    let report = state.assistant.prepare(&id).await?;
    Ok(Json(PrepareReply {
        ready: report.is_ready(),
        report,
    }))
}

/// Ask the course assistant a question.
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    let reply = state
        .assistant
        .ask(
            &id,
            &request.session,
            request.user_id.as_deref(),
            &request.question,
        )
        .await;
    Json(ChatReply { reply })
}

/// A session's transcript, oldest first.
pub async fn history(
    State(state): State<AppState>,
    Path((id, session)): Path<(String, String)>,
) -> Json<Vec<ChatMessage>> {
    Json(state.assistant.history(&id, &session).await)
}

/// Forget a session's transcript.
pub async fn clear_history(
    State(state): State<AppState>,
    Path((id, session)): Path<(String, String)>,
) -> axum::http::StatusCode {
    state.assistant.clear_history(&id, &session).await;
    axum::http::StatusCode::NO_CONTENT
}
