//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Directory uploaded materials are written to.
    pub storage_dir: PathBuf,
    /// Public URL prefix the storage directory is served under.
    pub storage_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:marketplace.db?mode=rwc` |
    /// | `STORAGE_DIR` | Material upload directory | `data/files` |
    /// | `STORAGE_BASE_URL` | URL prefix for uploads | `http://{API_ADDR}/files` |
    ///
    /// The assistant's hosted model is configured separately through
    /// `GEMINI_API_KEY` and friends.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr: SocketAddr = env::var("API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:marketplace.db?mode=rwc".to_string());

        let storage_dir = env::var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/files"));

        let storage_base_url =
            env::var("STORAGE_BASE_URL").unwrap_or_else(|_| format!("http://{}/files", addr));

        if storage_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyStorageUrl);
        }

        Ok(Self {
            addr,
            database_url,
            storage_dir,
            storage_base_url,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("STORAGE_BASE_URL cannot be empty")]
    EmptyStorageUrl,
}
