//! Course and lesson persistence.
//!
//! A course is written once, together with its lessons, inside a single
//! transaction. There is no update or delete path.

use sqlx::{FromRow, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Course, Lesson, MaterialRef, VideoSource};

#[derive(FromRow)]
struct CourseRow {
    id: String,
    title: String,
    description: String,
    instructor: String,
    price: f64,
    level: String,
    category: String,
    materials: String,
    ai_system_prompt: Option<String>,
    created_at: String,
}

#[derive(FromRow)]
struct LessonRow {
    title: String,
    duration: String,
    preview: bool,
    video_type: String,
    video_ref: String,
    transcript_file: Option<String>,
}

impl TryFrom<LessonRow> for Lesson {
    type Error = DatabaseError;

    fn try_from(row: LessonRow) -> Result<Self> {
        let video = match row.video_type.as_str() {
            "upload" => VideoSource::Upload {
                filename: row.video_ref,
            },
            "external" => VideoSource::External { url: row.video_ref },
            other => {
                return Err(DatabaseError::InvalidValue {
                    field: "video type",
                    value: other.to_string(),
                })
            }
        };

        Ok(Lesson {
            title: row.title,
            duration: row.duration,
            preview: row.preview,
            video,
            transcript_file: row.transcript_file,
        })
    }
}

fn video_columns(video: &VideoSource) -> (&'static str, &str) {
    match video {
        VideoSource::Upload { filename } => ("upload", filename.as_str()),
        VideoSource::External { url } => ("external", url.as_str()),
    }
}

/// Insert a course and its lessons.
///
/// `created_at` on the input is ignored; the stored timestamp is returned by
/// [`get_course`].
pub async fn create_course(pool: &SqlitePool, course: &Course) -> Result<()> {
    let materials = serde_json::to_string(&course.materials)?;
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO courses (id, title, description, instructor, price, level, category, materials, ai_system_prompt)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&course.id)
    .bind(&course.title)
    .bind(&course.description)
    .bind(&course.instructor)
    .bind(course.price)
    .bind(course.level.as_str())
    .bind(&course.category)
    .bind(&materials)
    .bind(&course.ai_system_prompt)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Course",
                    id: course.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    for (position, lesson) in course.lessons.iter().enumerate() {
        let (video_type, video_ref) = video_columns(&lesson.video);
        sqlx::query(
            r#"
            INSERT INTO lessons (course_id, position, title, duration, preview, video_type, video_ref, transcript_file)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course.id)
        .bind(position as i64)
        .bind(&lesson.title)
        .bind(&lesson.duration)
        .bind(lesson.preview)
        .bind(video_type)
        .bind(video_ref)
        .bind(&lesson.transcript_file)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        course_id = %course.id,
        lessons = course.lessons.len(),
        "Course stored"
    );

    Ok(())
}

async fn lessons_for(pool: &SqlitePool, course_id: &str) -> Result<Vec<Lesson>> {
    let rows = sqlx::query_as::<_, LessonRow>(
        r#"
        SELECT title, duration, preview, video_type, video_ref, transcript_file
        FROM lessons
        WHERE course_id = ?
        ORDER BY position
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Lesson::try_from).collect()
}

async fn hydrate(pool: &SqlitePool, row: CourseRow) -> Result<Course> {
    let lessons = lessons_for(pool, &row.id).await?;
    let materials: Vec<MaterialRef> = serde_json::from_str(&row.materials)?;

    Ok(Course {
        level: row.level.parse()?,
        id: row.id,
        title: row.title,
        description: row.description,
        instructor: row.instructor,
        price: row.price,
        category: row.category,
        lessons,
        materials,
        ai_system_prompt: row.ai_system_prompt,
        created_at: row.created_at,
    })
}

/// Get a course with its lessons by ID.
pub async fn get_course(pool: &SqlitePool, id: &str) -> Result<Course> {
    let row = sqlx::query_as::<_, CourseRow>(
        r#"
        SELECT id, title, description, instructor, price, level, category, materials, ai_system_prompt, created_at
        FROM courses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Course",
        id: id.to_string(),
    })?;

    hydrate(pool, row).await
}

/// List every course, oldest first.
pub async fn list_courses(pool: &SqlitePool) -> Result<Vec<Course>> {
    let rows = sqlx::query_as::<_, CourseRow>(
        r#"
        SELECT id, title, description, instructor, price, level, category, materials, ai_system_prompt, created_at
        FROM courses
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut courses = Vec::with_capacity(rows.len());
    for row in rows {
        courses.push(hydrate(pool, row).await?);
    }
    Ok(courses)
}

/// Count total courses.
pub async fn count_courses(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM courses
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
