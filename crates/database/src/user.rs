//! User profile operations.

use sqlx::{FromRow, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Role, TutorInfo, UserProfile};

#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    teaching_experience: Option<String>,
    expertise: Option<String>,
    qualifications: Option<String>,
    created_at: String,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self> {
        let tutor_info = match (row.teaching_experience, row.expertise, row.qualifications) {
            (Some(teaching_experience), Some(expertise), Some(qualifications)) => {
                Some(TutorInfo {
                    teaching_experience,
                    expertise,
                    qualifications,
                })
            }
            _ => None,
        };

        Ok(UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role.parse()?,
            tutor_info,
            created_at: row.created_at,
        })
    }
}

/// Create a user profile.
///
/// Tutor details are written only when the role is [`Role::Tutor`].
pub async fn create_user(pool: &SqlitePool, user: &UserProfile) -> Result<()> {
    let tutor_info = match user.role {
        Role::Tutor => user.tutor_info.as_ref(),
        Role::Student => None,
    };

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role, teaching_experience, expertise, qualifications)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role.as_str())
    .bind(tutor_info.map(|t| t.teaching_experience.as_str()))
    .bind(tutor_info.map(|t| t.expertise.as_str()))
    .bind(tutor_info.map(|t| t.qualifications.as_str()))
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a user profile by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<UserProfile> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, email, role, teaching_experience, expertise, qualifications, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })?
    .try_into()
}

/// Count users grouped by role.
pub async fn count_users_by_role(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT role, COUNT(*) as count
        FROM users
        GROUP BY role
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
