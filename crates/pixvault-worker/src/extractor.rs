//! Metadata extraction worker.
//!
//! `process` never fails: every outcome is expressed as a single guarded
//! document write, either `ready` with metadata or `failed` without. There
//! is no retry; the queue is configured for at most one delivery attempt,
//! and the document-side guard makes accidental re-delivery a no-op.

use std::sync::Arc;

use pixvault_core::models::{ExifData, ExtractionJob};
use pixvault_core::{is_valid_hash, ImageStatus};
use pixvault_db::{DocumentStore, ExtractionUpdate};
use pixvault_processing::{extract_dimensions, extract_exif};
use pixvault_storage::{blob_key, BlobStore};

/// Internal result of the pure extraction steps.
enum ExtractionOutcome {
    Extracted {
        width: u32,
        height: u32,
        exif: Option<ExifData>,
    },
    Failed {
        reason: String,
    },
}

/// Runs dimension and EXIF probes over stored blobs and applies the terminal
/// status transition.
pub struct MetadataExtractionWorker {
    blobs: Arc<dyn BlobStore>,
    docs: Arc<dyn DocumentStore>,
}

impl MetadataExtractionWorker {
    pub fn new(blobs: Arc<dyn BlobStore>, docs: Arc<dyn DocumentStore>) -> Self {
        Self { blobs, docs }
    }

    /// Process one extraction job. All failure branches resolve into a
    /// document write or a logged no-op; nothing propagates to the caller.
    #[tracing::instrument(skip(self), fields(hash = %job.hash))]
    pub async fn process(&self, job: ExtractionJob) {
        if !is_valid_hash(&job.hash) {
            tracing::warn!("Dropping extraction job with malformed hash");
            return;
        }

        // Idempotency guard: a record that is missing or already terminal
        // means this delivery has nothing to do.
        match self.docs.get(&job.hash).await {
            Ok(Some(record)) if record.status == ImageStatus::Processing => {}
            Ok(Some(record)) => {
                tracing::debug!(status = %record.status, "Record already terminal, skipping");
                return;
            }
            Ok(None) => {
                tracing::warn!("Extraction job references no record, skipping");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Document read failed, dropping job");
                return;
            }
        }

        let data = match self.blobs.get(&blob_key(&job.hash)).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Blob read failed, marking record failed");
                self.finish(&job.hash, ExtractionUpdate::failed()).await;
                return;
            }
        };

        // Container parsing is CPU-bound; run off the async pool.
        let outcome = match tokio::task::spawn_blocking(move || extract(&data)).await {
            Ok(outcome) => outcome,
            Err(e) => ExtractionOutcome::Failed {
                reason: format!("extraction task panicked: {}", e),
            },
        };

        let update = match outcome {
            ExtractionOutcome::Extracted {
                width,
                height,
                exif,
            } => {
                tracing::info!(width, height, has_exif = exif.is_some(), "Extraction succeeded");
                ExtractionUpdate::ready(width as i32, height as i32, exif)
            }
            ExtractionOutcome::Failed { reason } => {
                tracing::warn!(reason = %reason, "Extraction failed, marking record failed");
                ExtractionUpdate::failed()
            }
        };

        self.finish(&job.hash, update).await;
    }

    async fn finish(&self, id: &str, update: ExtractionUpdate) {
        match self.docs.finish_extraction(id, &update).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(id = %id, "Record no longer processing, transition skipped");
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Failed to persist extraction result");
            }
        }
    }
}

/// Dimension extraction decides success or failure; the EXIF probe is
/// best-effort and independently nullable.
fn extract(data: &[u8]) -> ExtractionOutcome {
    let (width, height) = match extract_dimensions(data) {
        Ok(dims) => dims,
        Err(e) => {
            return ExtractionOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    ExtractionOutcome::Extracted {
        width,
        height,
        exif: extract_exif(data),
    }
}
