use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::object_store::{check_key, ObjectStore};

/// In-process object store, used in tests and demo runs.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, _content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        check_key(key)?;
        self.objects.write().await.insert(key.to_string(), data);
        Ok(format!("memory://{}", key))
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        check_key(key)?;
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        check_key(key)?;
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        check_key(key)?;
        self.objects.write().await.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overwrite_keeps_one_object() {
        let store = MemoryObjectStore::new();
        store.put("a/b.txt", "text/plain", b"one".to_vec()).await.unwrap();
        let url = store.put("a/b.txt", "text/plain", b"two".to_vec()).await.unwrap();

        assert_eq!(url, "memory://a/b.txt");
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("a/b.txt").await.unwrap(), b"two");
    }
}
