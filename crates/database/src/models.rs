//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::DatabaseError;

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl FromStr for Level {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Level::Beginner),
            "Intermediate" => Ok(Level::Intermediate),
            "Advanced" => Ok(Level::Advanced),
            other => Err(DatabaseError::InvalidValue {
                field: "level",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Tutor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Tutor => "tutor",
        }
    }
}

impl FromStr for Role {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "tutor" => Ok(Role::Tutor),
            other => Err(DatabaseError::InvalidValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of uploaded course material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Transcript,
    Notes,
    Pdf,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Transcript => "transcript",
            MaterialType::Notes => "notes",
            MaterialType::Pdf => "pdf",
        }
    }
}

impl FromStr for MaterialType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transcript" => Ok(MaterialType::Transcript),
            "notes" => Ok(MaterialType::Notes),
            "pdf" => Ok(MaterialType::Pdf),
            other => Err(DatabaseError::InvalidValue {
                field: "material type",
                value: other.to_string(),
            }),
        }
    }
}

/// Free-text details only tutors provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorInfo {
    pub teaching_experience: String,
    pub expertise: String,
    pub qualifications: String,
}

/// A user profile, keyed by the identity provider's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Present only for tutors.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tutor_info: Option<TutorInfo>,
    pub created_at: String,
}

/// Where a lesson's video comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VideoSource {
    /// An uploaded video file.
    Upload { filename: String },
    /// A link to an externally hosted video.
    External { url: String },
}

/// A lesson; its order is its position in [`Course::lessons`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub preview: bool,
    pub video: VideoSource,
    #[serde(default)]
    pub transcript_file: Option<String>,
}

/// A material entry as listed on the course document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRef {
    pub title: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A course with its lessons and material list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub price: f64,
    pub level: Level,
    pub category: String,
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub materials: Vec<MaterialRef>,
    /// Concatenated transcript text handed to the hosted model.
    #[serde(default)]
    pub ai_system_prompt: Option<String>,
    pub created_at: String,
}

/// An uploaded material document (`course_materials`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: String,
    pub course_id: String,
    pub material_type: MaterialType,
    pub filename: String,
    pub url: String,
    /// Extracted text; empty for types whose text is not read.
    pub content: String,
    pub size: i64,
    pub content_type: String,
    pub created_at: String,
}

/// Fields needed to insert a material document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaterial {
    pub id: String,
    pub course_id: String,
    pub material_type: MaterialType,
    pub filename: String,
    pub url: String,
    pub content: String,
    pub size: i64,
    pub content_type: String,
}

/// What an embedding was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingKind {
    Transcript,
    Material,
}

impl EmbeddingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingKind::Transcript => "transcript",
            EmbeddingKind::Material => "material",
        }
    }
}

impl FromStr for EmbeddingKind {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transcript" => Ok(EmbeddingKind::Transcript),
            "material" => Ok(EmbeddingKind::Material),
            other => Err(DatabaseError::InvalidValue {
                field: "embedding kind",
                value: other.to_string(),
            }),
        }
    }
}

/// A stored embedding (`course_embeddings`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: i64,
    pub course_id: String,
    pub content: String,
    pub vector: Vec<f32>,
    pub kind: EmbeddingKind,
    pub created_at: String,
}

/// A logged question/answer pair (`chat_interactions`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatInteraction {
    pub id: i64,
    pub course_id: String,
    /// Absent for anonymous learners.
    pub user_id: Option<String>,
    pub question: String,
    pub response: String,
    pub created_at: String,
}

/// A record of a finished assistant training run (`course_models`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CourseModelRecord {
    pub id: i64,
    pub course_id: String,
    pub model_name: String,
    pub prompt_hash: Option<String>,
    pub embedding_count: i64,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trips() {
        for level in [Level::Beginner, Level::Intermediate, Level::Advanced] {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
        for kind in [MaterialType::Transcript, MaterialType::Notes, MaterialType::Pdf] {
            assert_eq!(kind.as_str().parse::<MaterialType>().unwrap(), kind);
        }
        assert_eq!("tutor".parse::<Role>().unwrap(), Role::Tutor);
        assert!(matches!(
            "expert".parse::<Level>(),
            Err(DatabaseError::InvalidValue { field: "level", .. })
        ));
    }

    #[test]
    fn test_student_profile_omits_tutor_info() {
        let profile = UserProfile {
            id: "uid-1".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::Student,
            tutor_info: None,
            created_at: "2025-01-01 00:00:00".to_string(),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "student");
        assert!(json.get("tutor_info").is_none());
    }

    #[test]
    fn test_video_source_serialization() {
        let json = serde_json::to_value(VideoSource::External {
            url: "https://youtu.be/abc".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "external");
        assert_eq!(json["url"], "https://youtu.be/abc");
    }
}
