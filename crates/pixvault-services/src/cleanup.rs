//! Retention sweep for document stores without native TTL.
//!
//! Removes records whose retention window has elapsed, then their blobs.
//! Also collects blobs orphaned by an upload that wrote the blob but failed
//! to create the record: the next sweep after the would-be record's TTL has
//! no record to find, and the orphaned blob ages out with it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pixvault_core::AppError;
use pixvault_db::DocumentStore;
use pixvault_storage::{blob_key, BlobStore};
use tokio::time::interval;

const SWEEP_INTERVAL_SECS: u64 = 3600;

#[derive(Clone)]
pub struct CleanupService {
    docs: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl CleanupService {
    pub fn new(docs: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { docs, blobs }
    }

    /// Start the hourly background sweep. Returns a JoinHandle for shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

            loop {
                sweep_interval.tick().await;

                match self.run_once().await {
                    Ok(count) if count > 0 => {
                        tracing::info!(expired = count, "Retention sweep removed expired images");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Retention sweep failed");
                    }
                }
            }
        })
    }

    /// Run one sweep. Returns the number of expired records removed.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self) -> Result<usize, AppError> {
        let expired = self
            .docs
            .delete_expired(Utc::now())
            .await
            .map_err(|e| AppError::Document(e.to_string()))?;

        for id in &expired {
            match self.blobs.delete(&blob_key(id)).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    // Record is gone; a stranded blob is only a storage leak.
                    tracing::warn!(id = %id, error = %e, "Failed to delete expired blob");
                }
            }
        }

        Ok(expired.len())
    }
}
