//! Object storage abstraction.

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};

/// Build the object key for a course material.
pub fn material_key(course_id: &str, filename: &str) -> String {
    format!("courses/{}/materials/{}", course_id, filename)
}

/// Reject keys that could escape the store's namespace.
pub(crate) fn check_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// A flat key/value blob store that hands back a URL for each object.
///
/// Implementations must be safe to share across tasks; the creation flow
/// uploads several files at once.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return the object's URL.
    ///
    /// An existing object under the same key is overwritten.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Fetch an object's bytes.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_key_format() {
        assert_eq!(
            material_key("course_1", "notes.txt"),
            "courses/course_1/materials/notes.txt"
        );
    }

    #[test]
    fn test_check_key_rejects_traversal() {
        assert!(check_key("courses/a/materials/b.txt").is_ok());
        assert!(matches!(check_key("../etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(check_key("/etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(check_key(""), Err(StorageError::InvalidKey(_))));
    }
}
