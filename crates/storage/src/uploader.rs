//! Material upload: object bytes plus a `course_materials` document.

use std::sync::Arc;

use async_trait::async_trait;
use database::{material, Database, MaterialType, NewMaterial};

use crate::error::{StorageError, StorageResult};
use crate::object_store::{material_key, ObjectStore};

/// A file handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MaterialFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMaterial {
    /// Id of the `course_materials` document.
    pub id: String,
    /// Where the stored object can be fetched.
    pub url: String,
}

/// Text the assistant may read from a file.
///
/// Transcripts are always read as text. Notes are read only when their
/// content type is textual. Everything else yields an empty string; invalid
/// UTF-8 is replaced rather than rejected.
pub fn extract_content(file: &MaterialFile, material_type: MaterialType) -> String {
    let readable = match material_type {
        MaterialType::Transcript => true,
        MaterialType::Notes => file.content_type.contains("text"),
        MaterialType::Pdf => false,
    };

    if readable {
        String::from_utf8_lossy(&file.data).into_owned()
    } else {
        String::new()
    }
}

/// Uploads a course material and records it.
///
/// Calls are not idempotent: uploading the same file twice stores two
/// documents.
#[async_trait]
pub trait MaterialUploader: Send + Sync {
    async fn upload(
        &self,
        course_id: &str,
        file: &MaterialFile,
        material_type: MaterialType,
    ) -> StorageResult<UploadedMaterial>;
}

/// [`MaterialUploader`] backed by an [`ObjectStore`] and the SQLite catalog.
#[derive(Clone)]
pub struct StoredMaterialUploader {
    store: Arc<dyn ObjectStore>,
    db: Database,
}

impl StoredMaterialUploader {
    pub fn new(store: Arc<dyn ObjectStore>, db: Database) -> Self {
        Self { store, db }
    }
}

#[async_trait]
impl MaterialUploader for StoredMaterialUploader {
    async fn upload(
        &self,
        course_id: &str,
        file: &MaterialFile,
        material_type: MaterialType,
    ) -> StorageResult<UploadedMaterial> {
        if file.filename.is_empty() || file.filename.contains('/') {
            return Err(StorageError::InvalidKey(file.filename.clone()));
        }

        let key = material_key(course_id, &file.filename);
        let url = self
            .store
            .put(&key, &file.content_type, file.data.clone())
            .await?;

        let record = NewMaterial {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            material_type,
            filename: file.filename.clone(),
            url: url.clone(),
            content: extract_content(file, material_type),
            size: file.data.len() as i64,
            content_type: file.content_type.clone(),
        };
        material::insert_material(self.db.pool(), &record).await?;

        tracing::info!(
            course_id = %course_id,
            material_id = %record.id,
            material_type = material_type.as_str(),
            backend = self.store.backend_name(),
            size_bytes = record.size,
            "Material uploaded"
        );

        Ok(UploadedMaterial { id: record.id, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryObjectStore;

    async fn uploader() -> (StoredMaterialUploader, Arc<MemoryObjectStore>, Database) {
        let db = Database::in_memory().await.unwrap();
        let store = Arc::new(MemoryObjectStore::new());
        (
            StoredMaterialUploader::new(store.clone(), db.clone()),
            store,
            db,
        )
    }

    #[test]
    fn test_extract_content_rules() {
        let text = MaterialFile::new("a.txt", "text/plain", "Hello");
        let md = MaterialFile::new("a.md", "application/octet-stream", "Hello");
        let pdf = MaterialFile::new("a.pdf", "application/pdf", "%PDF-1.4");

        assert_eq!(extract_content(&md, MaterialType::Transcript), "Hello");
        assert_eq!(extract_content(&text, MaterialType::Notes), "Hello");
        assert_eq!(extract_content(&md, MaterialType::Notes), "");
        assert_eq!(extract_content(&pdf, MaterialType::Pdf), "");
    }

    #[tokio::test]
    async fn test_upload_stores_object_and_document() {
        let (uploader, store, db) = uploader().await;
        let file = MaterialFile::new("lesson1.txt", "text/plain", "Closures capture variables.");

        let uploaded = uploader
            .upload("course_1", &file, MaterialType::Transcript)
            .await
            .unwrap();
        assert_eq!(uploaded.url, "memory://courses/course_1/materials/lesson1.txt");
        assert!(store
            .exists("courses/course_1/materials/lesson1.txt")
            .await
            .unwrap());

        let docs = material::list_materials(db.pool(), "course_1").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, uploaded.id);
        assert_eq!(docs[0].content, "Closures capture variables.");
        assert_eq!(docs[0].size, 27);
    }

    #[tokio::test]
    async fn test_repeat_upload_creates_second_document() {
        let (uploader, store, db) = uploader().await;
        let file = MaterialFile::new("notes.txt", "text/plain", "x");

        let first = uploader.upload("c", &file, MaterialType::Notes).await.unwrap();
        let second = uploader.upload("c", &file, MaterialType::Notes).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 1);
        assert_eq!(material::count_materials(db.pool(), "c").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rejects_nested_filename() {
        let (uploader, _, _) = uploader().await;
        let file = MaterialFile::new("../x.txt", "text/plain", "x");

        let result = uploader.upload("c", &file, MaterialType::Notes).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
