//! HTTP API for the course marketplace.
//!
//! Serves the catalog, course creation, accounts and the per-course chat
//! assistant as JSON. Uploaded materials are written to a local directory
//! and served back under `/files`.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use course_service::{InMemoryIdentityProvider, ResponseGenerator};
use database::Database;
use storage::{LocalObjectStore, StoredMaterialUploader};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting marketplace API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let store = LocalObjectStore::new(&config.storage_dir, config.storage_base_url.clone()).await?;
    let uploader = Arc::new(StoredMaterialUploader::new(Arc::new(store), db.clone()));

    let generator = ResponseGenerator::from_env();
    info!(mode = ?generator.mode(), "Response generator ready");

    let state = AppState::new(
        db,
        uploader,
        Arc::new(InMemoryIdentityProvider::new()),
        generator,
    );

    let app = routes::router()
        .nest_service("/files", ServeDir::new(&config.storage_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!(addr = %config.addr, "Marketplace API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
