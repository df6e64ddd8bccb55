use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{StorageError, StorageResult};
use crate::object_store::{check_key, ObjectStore};

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    ///
    /// `base_url` is the prefix under which the directory is served, e.g.
    /// `http://localhost:3000/files`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(Self {
            base_path,
            base_url,
        })
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        check_key(key)?;
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, _content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            "Stored object on local disk"
        );

        Ok(self.generate_url(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost:3000/files/".to_string())
            .await
            .unwrap();

        let key = "courses/c1/materials/notes.txt";
        let url = store.put(key, "text/plain", b"hello".to_vec()).await.unwrap();
        assert_eq!(url, "http://localhost:3000/files/courses/c1/materials/notes.txt");

        assert!(store.exists(key).await.unwrap());
        assert_eq!(store.get(key).await.unwrap(), b"hello");

        store.delete(key).await.unwrap();
        assert!(!store.exists(key).await.unwrap());
        assert!(matches!(store.get(key).await, Err(StorageError::NotFound(_))));

        // Deleting twice is fine.
        store.delete(key).await.unwrap();
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost".to_string())
            .await
            .unwrap();

        assert!(matches!(
            store.get("../../../etc/passwd").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.put("/etc/passwd", "text/plain", vec![]).await,
            Err(StorageError::InvalidKey(_))
        ));
    }
}
