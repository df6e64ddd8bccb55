//! Course creation: three validated steps and a single submit.
//!
//! Steps are details, then lessons, then materials. Submit re-validates all
//! three, uploads every material at once, and writes the course document.
//! Uploads that landed before a failure are left in place.

use std::sync::Arc;

use database::{
    course, Course, Database, Lesson, Level, MaterialRef, MaterialType, Role, UserProfile,
    VideoSource,
};
use futures::future::try_join_all;
use serde::Deserialize;
use storage::{extract_content, MaterialFile, MaterialUploader};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Result, ServiceError};

/// A creation step that failed validation. Lessons and materials are
/// numbered from 1.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CourseValidationError {
    #[error("course {0} is required")]
    MissingField(&'static str),

    #[error("course price must be a non-negative number, got {0}")]
    InvalidPrice(f64),

    #[error("a course needs at least one lesson")]
    NoLessons,

    #[error("lesson {index}: {field} is required")]
    LessonField { index: usize, field: &'static str },

    #[error("at least one course material is required")]
    NoMaterials,

    #[error("material {index}: {field} is required")]
    MaterialField { index: usize, field: &'static str },
}

/// Toggles for rules the creation form is inconsistent about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Require every lesson to name a transcript file.
    pub require_lesson_transcript: bool,
}

/// Step one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseDetails {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: Level,
    pub price: f64,
}

/// A course material waiting to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDraft {
    pub title: String,
    pub material_type: MaterialType,
    pub description: Option<String>,
    pub file: MaterialFile,
}

/// Everything the creation form collects.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub details: CourseDetails,
    pub lessons: Vec<Lesson>,
    pub materials: Vec<MaterialDraft>,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_details(details: &CourseDetails) -> std::result::Result<(), CourseValidationError> {
    if blank(&details.title) {
        return Err(CourseValidationError::MissingField("title"));
    }
    if blank(&details.description) {
        return Err(CourseValidationError::MissingField("description"));
    }
    if blank(&details.category) {
        return Err(CourseValidationError::MissingField("category"));
    }
    if !details.price.is_finite() || details.price < 0.0 {
        return Err(CourseValidationError::InvalidPrice(details.price));
    }
    Ok(())
}

pub fn validate_lessons(
    lessons: &[Lesson],
    policy: ValidationPolicy,
) -> std::result::Result<(), CourseValidationError> {
    if lessons.is_empty() {
        return Err(CourseValidationError::NoLessons);
    }

    for (i, lesson) in lessons.iter().enumerate() {
        let index = i + 1;
        let missing = |field| Err(CourseValidationError::LessonField { index, field });

        if blank(&lesson.title) {
            return missing("title");
        }
        if blank(&lesson.duration) {
            return missing("duration");
        }
        match &lesson.video {
            VideoSource::Upload { filename } if blank(filename) => return missing("video file"),
            VideoSource::External { url } if blank(url) => return missing("video url"),
            _ => {}
        }
        if policy.require_lesson_transcript
            && lesson.transcript_file.as_deref().map_or(true, blank)
        {
            return missing("transcript file");
        }
    }

    Ok(())
}

pub fn validate_materials(materials: &[MaterialDraft]) -> std::result::Result<(), CourseValidationError> {
    if materials.is_empty() {
        return Err(CourseValidationError::NoMaterials);
    }

    for (i, material) in materials.iter().enumerate() {
        let index = i + 1;
        if blank(&material.title) {
            return Err(CourseValidationError::MaterialField { index, field: "title" });
        }
        if blank(&material.file.filename) {
            return Err(CourseValidationError::MaterialField { index, field: "file name" });
        }
        if material.file.data.is_empty() {
            return Err(CourseValidationError::MaterialField { index, field: "file content" });
        }
    }

    Ok(())
}

/// Join transcript texts, in list order, into the hosted model's prompt.
pub fn transcript_prompt(materials: &[MaterialDraft]) -> Option<String> {
    let transcripts: Vec<String> = materials
        .iter()
        .filter(|m| m.material_type == MaterialType::Transcript)
        .map(|m| extract_content(&m.file, m.material_type))
        .collect();

    if transcripts.is_empty() {
        None
    } else {
        Some(transcripts.join("\n\n"))
    }
}

/// Submits validated drafts as new courses.
#[derive(Clone)]
pub struct CourseCreator {
    db: Database,
    uploader: Arc<dyn MaterialUploader>,
    policy: ValidationPolicy,
}

impl CourseCreator {
    pub fn new(db: Database, uploader: Arc<dyn MaterialUploader>) -> Self {
        Self::with_policy(db, uploader, ValidationPolicy::default())
    }

    pub fn with_policy(
        db: Database,
        uploader: Arc<dyn MaterialUploader>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            db,
            uploader,
            policy,
        }
    }

    /// Create a course authored by `author`, who must be a tutor.
    pub async fn submit(&self, author: &UserProfile, draft: CourseDraft) -> Result<Course> {
        if author.role != Role::Tutor {
            return Err(ServiceError::Forbidden(
                "only tutors can create courses".to_string(),
            ));
        }

        validate_details(&draft.details)?;
        validate_lessons(&draft.lessons, self.policy)?;
        validate_materials(&draft.materials)?;

        let course_id = format!("course_{}", uuid::Uuid::new_v4().simple());

        let uploads = try_join_all(draft.materials.iter().map(|material| {
            self.uploader
                .upload(&course_id, &material.file, material.material_type)
        }))
        .await
        .map_err(|e| {
            warn!(
                course_id = %course_id,
                error = %e,
                "Material upload failed; uploads that finished are kept"
            );
            e
        })?;

        let materials = draft
            .materials
            .iter()
            .zip(&uploads)
            .map(|(material, uploaded)| MaterialRef {
                title: material.title.clone(),
                material_type: material.material_type,
                description: material.description.clone(),
                url: Some(uploaded.url.clone()),
            })
            .collect();

        let course = Course {
            id: course_id,
            title: draft.details.title.trim().to_string(),
            description: draft.details.description.trim().to_string(),
            instructor: author.name.clone(),
            price: draft.details.price,
            level: draft.details.level,
            category: draft.details.category.trim().to_string(),
            ai_system_prompt: transcript_prompt(&draft.materials),
            lessons: draft.lessons,
            materials,
            created_at: String::new(),
        };

        course::create_course(self.db.pool(), &course).await?;

        info!(
            course_id = %course.id,
            lessons = course.lessons.len(),
            materials = course.materials.len(),
            "Course created"
        );

        Ok(course::get_course(self.db.pool(), &course.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CourseDetails {
        CourseDetails {
            title: "Web Basics".to_string(),
            description: "HTML and CSS".to_string(),
            category: "Web".to_string(),
            level: Level::Beginner,
            price: 10.0,
        }
    }

    fn lesson(title: &str) -> Lesson {
        Lesson {
            title: title.to_string(),
            duration: "5:00".to_string(),
            preview: false,
            video: VideoSource::External {
                url: "https://youtu.be/x".to_string(),
            },
            transcript_file: None,
        }
    }

    fn draft(kind: MaterialType, text: &str) -> MaterialDraft {
        MaterialDraft {
            title: "file".to_string(),
            material_type: kind,
            description: None,
            file: MaterialFile::new("file.txt", "text/plain", text),
        }
    }

    #[test]
    fn test_details_name_the_missing_field() {
        let mut d = details();
        d.category = "  ".to_string();
        assert_eq!(
            validate_details(&d),
            Err(CourseValidationError::MissingField("category"))
        );

        let mut d = details();
        d.price = -1.0;
        assert!(matches!(
            validate_details(&d),
            Err(CourseValidationError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_lessons_report_one_based_index() {
        let mut second = lesson("Two");
        second.duration = String::new();

        assert_eq!(
            validate_lessons(&[lesson("One"), second], ValidationPolicy::default()),
            Err(CourseValidationError::LessonField {
                index: 2,
                field: "duration"
            })
        );
        assert_eq!(
            validate_lessons(&[], ValidationPolicy::default()),
            Err(CourseValidationError::NoLessons)
        );
    }

    #[test]
    fn test_transcript_policy() {
        let lessons = [lesson("One")];
        assert!(validate_lessons(&lessons, ValidationPolicy::default()).is_ok());

        let strict = ValidationPolicy {
            require_lesson_transcript: true,
        };
        assert_eq!(
            validate_lessons(&lessons, strict),
            Err(CourseValidationError::LessonField {
                index: 1,
                field: "transcript file"
            })
        );
    }

    #[test]
    fn test_materials_required() {
        assert_eq!(validate_materials(&[]), Err(CourseValidationError::NoMaterials));
        assert_eq!(
            validate_materials(&[draft(MaterialType::Notes, "")]),
            Err(CourseValidationError::MaterialField {
                index: 1,
                field: "file content"
            })
        );
    }

    #[test]
    fn test_transcript_prompt_joins_in_order() {
        let materials = [
            draft(MaterialType::Transcript, "First transcript."),
            draft(MaterialType::Notes, "Notes."),
            draft(MaterialType::Transcript, "Second transcript."),
        ];
        assert_eq!(
            transcript_prompt(&materials).as_deref(),
            Some("First transcript.\n\nSecond transcript.")
        );
        assert_eq!(transcript_prompt(&[draft(MaterialType::Pdf, "x")]), None);
    }
}
