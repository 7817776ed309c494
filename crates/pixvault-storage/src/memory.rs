//! In-memory blob store for tests and ephemeral local runs.

use crate::traits::{BlobError, BlobResult, BlobStore};
use crate::BlobBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct StoredBlob {
    content_type: String,
    data: Vec<u8>,
}

/// Blob store backed by a process-local map. Contents vanish on drop.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs (test helper).
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content type recorded for a key, if present (test helper).
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .map(|b| b.content_type.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> BlobResult<()> {
        self.blobs.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .map(|b| b.data.clone())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.blobs
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> BlobResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(key))
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Memory
    }
}
