//! Delete orchestration: coordinated removal across blob store, document
//! store, and edge cache.
//!
//! Step order is fixed: blob, then document, then cache purge. The
//! irreversible storage-side steps run first; a purge failure leaves only a
//! lagging edge cache behind and is reported as a distinguished partial
//! failure, never rolled back and never retried here. Re-running the whole
//! delete is safe because steps 1 and 2 tolerate not-found.

use std::sync::Arc;

use pixvault_core::models::image::derive_url;
use pixvault_core::{is_valid_hash, AppError};
use pixvault_db::DocumentStore;
use pixvault_storage::{blob_key, BlobStore};

use crate::purge::CachePurge;

/// Caller-visible result of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// All three steps succeeded (or found nothing to remove).
    Completed,
    /// Storage-side removal succeeded but the edge purge failed; cached
    /// copies may be served until they expire naturally.
    PurgeFailed { detail: String },
}

pub struct DeleteOrchestrator {
    blobs: Arc<dyn BlobStore>,
    docs: Arc<dyn DocumentStore>,
    purge: Arc<dyn CachePurge>,
    base_url: String,
}

impl DeleteOrchestrator {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        docs: Arc<dyn DocumentStore>,
        purge: Arc<dyn CachePurge>,
        base_url: String,
    ) -> Self {
        Self {
            blobs,
            docs,
            purge,
            base_url,
        }
    }

    /// Remove an image everywhere. Deleting an id that does not exist is a
    /// success (idempotent delete).
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, AppError> {
        if !is_valid_hash(id) {
            return Err(AppError::InvalidInput(format!("Malformed image id '{}'", id)));
        }

        // Steps run in order regardless of earlier failures; the first hard
        // backend error is reported after all steps have had their chance.
        let mut backend_failure: Option<AppError> = None;

        match self.blobs.delete(&blob_key(id)).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!("Blob already absent");
            }
            Err(e) => {
                tracing::error!(error = %e, "Blob delete failed");
                backend_failure = Some(AppError::Storage(e.to_string()));
            }
        }

        match self.docs.delete(id).await {
            Ok(existed) => {
                if !existed {
                    tracing::debug!("Record already absent");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Document delete failed");
                backend_failure.get_or_insert(AppError::Document(e.to_string()));
            }
        }

        let url = derive_url(&self.base_url, id);
        let purge_result = self.purge.invalidate(&url).await;

        if let Some(err) = backend_failure {
            // The backend error wins the result, but a coinciding purge
            // failure must still be observable.
            if let Err(e) = &purge_result {
                tracing::warn!(error = %e, url = %url, "Cache purge also failed");
            }
            return Err(err);
        }

        match purge_result {
            Ok(()) => {
                tracing::info!("Image deleted");
                Ok(DeleteOutcome::Completed)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    url = %url,
                    "Storage deletion succeeded but cache purge failed"
                );
                Ok(DeleteOutcome::PurgeFailed {
                    detail: e.to_string(),
                })
            }
        }
    }
}
