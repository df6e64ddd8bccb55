//! Account routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use course_service::Registration;
use database::UserProfile;
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let profile = state.accounts.register(registration).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Check credentials and return the matching profile.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .accounts
        .sign_in(&request.email, &request.password)
        .await?;
    Ok(Json(profile))
}

/// Fetch a profile by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.accounts.profile(&id).await?))
}
