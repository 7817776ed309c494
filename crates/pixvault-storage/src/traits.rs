//! Blob storage abstraction trait
//!
//! All blob backends (local filesystem, S3, in-memory) implement this trait.
//! The orchestration layer works against it and never touches backend
//! specifics.

use async_trait::async_trait;
use pixvault_core::BlobBackend;
use thiserror::Error;

/// Blob storage operation errors
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlobError {
    /// Delete treats a missing blob as already done; callers use this to
    /// decide idempotency.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlobError::NotFound(_))
    }
}

/// Result type for blob storage operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Blob storage abstraction.
///
/// Keys are produced by [`crate::keys::blob_key`]; backends must reject keys
/// containing `..` or a leading `/`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write raw bytes under a key. Overwriting an existing key is allowed;
    /// under content addressing the bytes are identical by construction.
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> BlobResult<()>;

    /// Read the full blob for a key.
    async fn get(&self, key: &str) -> BlobResult<Vec<u8>>;

    /// Delete the blob for a key. Returns `NotFound` when there was nothing
    /// to delete; callers decide whether that counts as success.
    async fn delete(&self, key: &str) -> BlobResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> BlobResult<bool>;

    /// Which backend this is (for logging and diagnostics).
    fn backend_type(&self) -> BlobBackend;
}
