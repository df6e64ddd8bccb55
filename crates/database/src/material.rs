//! Course material documents.

use sqlx::{FromRow, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{MaterialRecord, MaterialType, NewMaterial};

#[derive(FromRow)]
struct MaterialRow {
    id: String,
    course_id: String,
    #[sqlx(rename = "type")]
    material_type: String,
    filename: String,
    url: String,
    content: String,
    size: i64,
    content_type: String,
    created_at: String,
}

impl TryFrom<MaterialRow> for MaterialRecord {
    type Error = DatabaseError;

    fn try_from(row: MaterialRow) -> Result<Self> {
        Ok(MaterialRecord {
            material_type: row.material_type.parse()?,
            id: row.id,
            course_id: row.course_id,
            filename: row.filename,
            url: row.url,
            content: row.content,
            size: row.size,
            content_type: row.content_type,
            created_at: row.created_at,
        })
    }
}

/// Insert a material document.
pub async fn insert_material(pool: &SqlitePool, material: &NewMaterial) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO course_materials (id, course_id, type, filename, url, content, size, content_type)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&material.id)
    .bind(&material.course_id)
    .bind(material.material_type.as_str())
    .bind(&material.filename)
    .bind(&material.url)
    .bind(&material.content)
    .bind(material.size)
    .bind(&material.content_type)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all materials of a course in upload order.
pub async fn list_materials(pool: &SqlitePool, course_id: &str) -> Result<Vec<MaterialRecord>> {
    let rows = sqlx::query_as::<_, MaterialRow>(
        r#"
        SELECT id, course_id, type, filename, url, content, size, content_type, created_at
        FROM course_materials
        WHERE course_id = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(MaterialRecord::try_from).collect()
}

/// List materials of one type for a course.
pub async fn list_materials_by_type(
    pool: &SqlitePool,
    course_id: &str,
    material_type: MaterialType,
) -> Result<Vec<MaterialRecord>> {
    let rows = sqlx::query_as::<_, MaterialRow>(
        r#"
        SELECT id, course_id, type, filename, url, content, size, content_type, created_at
        FROM course_materials
        WHERE course_id = ? AND type = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(course_id)
    .bind(material_type.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(MaterialRecord::try_from).collect()
}

/// Count materials stored for a course.
pub async fn count_materials(pool: &SqlitePool, course_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM course_materials WHERE course_id = ?
        "#,
    )
    .bind(course_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
