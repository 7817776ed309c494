//! Document store abstraction trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pixvault_core::models::{ExifData, ImageRecord, ImageStatus};
use thiserror::Error;

/// Document store operation errors
#[derive(Debug, Error)]
pub enum DocStoreError {
    #[error("Document store backend error: {0}")]
    Backend(String),

    #[error("Record serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for document store operations
pub type DocResult<T> = Result<T, DocStoreError>;

/// Result of an atomic create-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A record with this id already exists. The caller must re-read; two
    /// concurrent uploads of identical content race here and exactly one
    /// wins the create.
    Conflict,
}

/// The single mutation the extraction worker applies: the transition out of
/// `processing`, carrying the extracted metadata (or none, on failure).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionUpdate {
    pub status: ImageStatus,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub exif: Option<ExifData>,
}

impl ExtractionUpdate {
    /// Successful extraction: dimensions plus whatever EXIF was found.
    pub fn ready(width: i32, height: i32, exif: Option<ExifData>) -> Self {
        Self {
            status: ImageStatus::Ready,
            width: Some(width),
            height: Some(height),
            exif,
        }
    }

    /// Failed extraction: terminal `failed`, no partial metadata persisted.
    pub fn failed() -> Self {
        Self {
            status: ImageStatus::Failed,
            width: None,
            height: None,
            exif: None,
        }
    }
}

/// Document store abstraction.
///
/// Implementations must provide read-after-write consistency on a single id
/// and an atomic create-if-absent.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read by content hash.
    async fn get(&self, id: &str) -> DocResult<Option<ImageRecord>>;

    /// Create-if-absent. Never overwrites; returns `Conflict` when the id
    /// already exists.
    async fn create(&self, record: &ImageRecord) -> DocResult<CreateOutcome>;

    /// Apply the terminal extraction transition, but only while the record
    /// is still `processing`. Returns whether the update was applied; `false`
    /// means the record was missing or already terminal, and the caller
    /// treats the job as a no-op (re-delivery tolerance).
    async fn finish_extraction(&self, id: &str, update: &ExtractionUpdate) -> DocResult<bool>;

    /// Delete by id. Returns whether a record existed.
    async fn delete(&self, id: &str) -> DocResult<bool>;

    /// Remove records whose retention window has elapsed at `now`. Returns
    /// the removed ids so the caller can drop the corresponding blobs.
    /// Backends with native TTL support may implement this as a no-op.
    async fn delete_expired(&self, now: DateTime<Utc>) -> DocResult<Vec<String>>;
}
