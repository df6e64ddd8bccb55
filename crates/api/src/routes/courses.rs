//! Catalog and course creation routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use course_service::{CourseDetails, CourseDraft, CourseFilters, MaterialDraft};
use database::{Course, Lesson, MaterialType};
use serde::Deserialize;
use storage::MaterialFile;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// An uploaded file, base64 encoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub filename: String,
    pub content_type: String,
    pub data: String,
}

/// A material entry in a creation request.
#[derive(Debug, Deserialize)]
pub struct MaterialPayload {
    pub title: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    #[serde(default)]
    pub description: Option<String>,
    pub file: FilePayload,
}

/// Course creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub author_id: String,
    #[serde(flatten)]
    pub details: CourseDetails,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub materials: Vec<MaterialPayload>,
}

impl CreateCourseRequest {
    fn into_draft(self) -> Result<CourseDraft> {
        let materials = self
            .materials
            .into_iter()
            .map(|m| {
                let data = base64::engine::general_purpose::STANDARD
                    .decode(m.file.data.as_bytes())
                    .map_err(|e| {
                        ApiError::BadRequest(format!(
                            "material '{}' is not valid base64: {}",
                            m.file.filename, e
                        ))
                    })?;
                Ok(MaterialDraft {
                    title: m.title,
                    material_type: m.material_type,
                    description: m.description,
                    file: MaterialFile::new(m.file.filename, m.file.content_type, data),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CourseDraft {
            details: self.details,
            lessons: self.lessons,
            materials,
        })
    }
}

/// List courses matching the query filters.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filters): Query<CourseFilters>,
) -> Result<Json<Vec<Course>>> {
    Ok(Json(state.catalog.list(&filters).await?))
}

/// Fetch a single course.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>> {
    Ok(Json(state.catalog.get(&id).await?))
}

/// Distinct course categories.
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog.categories().await?))
}

/// Validate and publish a new course.
pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>)> {
    let author = state.accounts.profile(&request.author_id).await?;
    let draft = request.into_draft()?;

    let course = state.creator.submit(&author, draft).await?;
    tracing::info!(course_id = %course.id, author = %author.id, "Course published");

    Ok((StatusCode::CREATED, Json(course)))
}
