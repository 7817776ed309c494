//! Upload orchestration: validate, hash, deduplicate, write, enqueue.
//!
//! Ordering invariant: the blob is written before the document record is
//! created, so a record that exists always references a retrievable blob.
//! The reverse failure (blob written, create failed) leaves an orphaned blob
//! that the retention sweep collects.

use std::sync::Arc;

use pixvault_core::models::{ExtractionJob, ImageRecord};
use pixvault_core::{content_hash, validation, AppError, Config};
use pixvault_db::{CreateOutcome, DocumentStore};
use pixvault_storage::{blob_key, BlobStore};
use pixvault_worker::WorkQueue;

/// Upload-path configuration, extracted from [`Config`].
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub base_url: String,
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub ttl_seconds: i64,
}

impl UploadConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.public_base_url.clone(),
            max_upload_bytes: config.max_upload_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
            ttl_seconds: config.ttl_seconds,
        }
    }
}

/// Result of an upload: the canonical record, and whether this call created
/// it.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub record: ImageRecord,
    pub is_new: bool,
}

pub struct UploadOrchestrator {
    blobs: Arc<dyn BlobStore>,
    docs: Arc<dyn DocumentStore>,
    queue: Arc<dyn WorkQueue>,
    config: UploadConfig,
}

impl UploadOrchestrator {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        docs: Arc<dyn DocumentStore>,
        queue: Arc<dyn WorkQueue>,
        config: UploadConfig,
    ) -> Self {
        Self {
            blobs,
            docs,
            queue,
            config,
        }
    }

    /// Ingest raw bytes. Identical content is recognized by hash and returns
    /// the existing record without touching the blob store, document store
    /// (beyond the point read), or queue.
    #[tracing::instrument(skip(self, data), fields(size = data.len(), content_type = %content_type))]
    pub async fn upload(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadOutcome, AppError> {
        // Preconditions run before any backend call.
        validation::validate_content_type(content_type, &self.config.allowed_content_types)?;
        validation::validate_body_size(data.len(), self.config.max_upload_bytes)?;

        let id = content_hash(&data);

        if let Some(existing) = self.read_record(&id).await? {
            tracing::debug!(id = %id, "Deduplicated upload, returning existing record");
            return Ok(UploadOutcome {
                record: existing,
                is_new: false,
            });
        }

        let size = data.len() as i64;

        // Blob first: once the record exists, its blob must be retrievable.
        self.blobs
            .put(&blob_key(&id), content_type, data)
            .await
            .map_err(|e| {
                tracing::error!(id = %id, error = %e, "Blob write failed, aborting upload");
                AppError::Storage(e.to_string())
            })?;

        let record = ImageRecord::new(
            id.clone(),
            &self.config.base_url,
            size,
            content_type.to_string(),
            self.config.ttl_seconds,
        );

        match self
            .docs
            .create(&record)
            .await
            .map_err(|e| AppError::Document(e.to_string()))?
        {
            CreateOutcome::Created => {}
            CreateOutcome::Conflict => {
                // Lost a race against a concurrent identical upload; the
                // winner's record is authoritative.
                tracing::debug!(id = %id, "Create conflict, treating as deduplicated upload");
                let existing = self.read_record(&id).await?.ok_or_else(|| {
                    AppError::Document(format!("Record {} vanished after create conflict", id))
                })?;
                return Ok(UploadOutcome {
                    record: existing,
                    is_new: false,
                });
            }
        }

        // Best-effort: a failed enqueue leaves the record in `processing`
        // indefinitely, which is the accepted trade-off.
        if let Err(e) = self.queue.enqueue(ExtractionJob::new(id.clone())).await {
            tracing::warn!(
                id = %id,
                error = %e,
                "Failed to enqueue extraction job; record will stay in processing"
            );
        }

        tracing::info!(id = %id, size_bytes = size, "Upload stored");

        Ok(UploadOutcome {
            record,
            is_new: true,
        })
    }

    async fn read_record(&self, id: &str) -> Result<Option<ImageRecord>, AppError> {
        self.docs
            .get(id)
            .await
            .map_err(|e| AppError::Document(e.to_string()))
    }
}
