//! SQLite persistence layer for the course marketplace.
//!
//! Users, courses, uploaded materials, embeddings, trained-model records and
//! the chat interaction log, stored with SQLx. Each table has its own module
//! of free functions taking a `&SqlitePool`.
//!
//! # Example
//!
//! ```no_run
//! use database::{course, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:marketplace.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     for course in course::list_courses(db.pool()).await? {
//!         println!("{} ({})", course.title, course.level);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod course;
pub mod course_model;
pub mod embedding;
pub mod error;
pub mod interaction;
pub mod material;
pub mod models;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    ChatInteraction, Course, CourseModelRecord, EmbeddingKind, EmbeddingRecord, Lesson, Level,
    MaterialRecord, MaterialRef, MaterialType, NewMaterial, Role, TutorInfo, UserProfile,
    VideoSource,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite URL such as `sqlite:marketplace.db?mode=rwc`.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(url, pool_size, "Opened course database");

        Ok(Self { pool })
    }

    /// Open a migrated in-memory database.
    ///
    /// Every SQLite connection to `:memory:` is a separate database, so the
    /// pool is pinned to a single connection.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Schema migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
