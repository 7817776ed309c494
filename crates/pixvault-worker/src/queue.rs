//! Extraction queue: enqueue trait and the in-process bounded consumer pool.
//!
//! Delivery is at most once: a job handed to a consumer is never requeued,
//! whatever the processing outcome. Shutdown is implicit; dropping the last
//! queue handle closes the channel and the pool drains and exits.

use std::sync::Arc;

use async_trait::async_trait;
use pixvault_core::models::ExtractionJob;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};

use crate::extractor::MetadataExtractionWorker;

/// Enqueue failures. The upload path treats these as non-fatal.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Extraction queue is full")]
    Full,

    #[error("Extraction queue is closed")]
    Closed,
}

/// Work queue abstraction: hand an extraction job to the asynchronous path.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn enqueue(&self, job: ExtractionJob) -> Result<(), QueueError>;
}

#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Bound on queued, not-yet-claimed jobs.
    pub capacity: usize,
    /// Jobs processed concurrently by the pool.
    pub max_concurrent: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            max_concurrent: 4,
        }
    }
}

/// In-process extraction queue with a bounded channel and a
/// semaphore-limited consumer pool.
pub struct ExtractionQueue {
    tx: mpsc::Sender<ExtractionJob>,
}

impl ExtractionQueue {
    pub fn new(worker: Arc<MetadataExtractionWorker>, config: QueueConfig) -> Self {
        let capacity = config.capacity.max(1);
        let max_concurrent = config.max_concurrent.max(1);
        let (tx, rx) = mpsc::channel(capacity);

        tokio::spawn(async move {
            Self::consumer_pool(rx, worker, max_concurrent).await;
        });

        tracing::info!(
            capacity = capacity,
            max_concurrent = max_concurrent,
            "Extraction queue started"
        );

        Self { tx }
    }

    async fn consumer_pool(
        mut rx: mpsc::Receiver<ExtractionJob>,
        worker: Arc<MetadataExtractionWorker>,
        max_concurrent: usize,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        while let Some(job) = rx.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                // Closed semaphore means the pool is going away.
                Err(_) => break,
            };
            let worker = worker.clone();
            tokio::spawn(async move {
                worker.process(job).await;
                drop(permit);
            });
        }

        tracing::info!("Extraction queue drained, consumer pool exiting");
    }
}

#[async_trait]
impl WorkQueue for ExtractionQueue {
    async fn enqueue(&self, job: ExtractionJob) -> Result<(), QueueError> {
        tracing::debug!(hash = %job.hash, "Enqueuing extraction job");
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                tracing::warn!("Extraction queue is full, rejecting job");
                QueueError::Full
            }
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}
