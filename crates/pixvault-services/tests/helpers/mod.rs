//! Recording and fault-injecting doubles for orchestration tests.
//!
//! Each double wraps the in-memory implementation and appends to a shared
//! call log so tests can assert on call counts and ordering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pixvault_core::models::{ExtractionJob, ImageRecord};
use pixvault_db::{
    CreateOutcome, DocResult, DocumentStore, ExtractionUpdate, MemoryDocumentStore,
};
use pixvault_services::{CachePurge, PurgeError};
use pixvault_storage::{BlobBackend, BlobResult, BlobStore, MemoryBlobStore};
use pixvault_worker::{QueueError, WorkQueue};

/// Shared, ordered log of backend calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn count_of(log: &CallLog, name: &str) -> usize {
    log.lock().unwrap().iter().filter(|c| *c == name).count()
}

pub struct RecordingBlobStore {
    pub inner: MemoryBlobStore,
    log: CallLog,
    fail_delete: AtomicBool,
}

impl RecordingBlobStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            inner: MemoryBlobStore::new(),
            log,
            fail_delete: AtomicBool::new(false),
        }
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    fn record(&self, name: &str) {
        self.log.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> BlobResult<()> {
        self.record("blob.put");
        self.inner.put(key, content_type, data).await
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        self.record("blob.get");
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.record("blob.delete");
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(pixvault_storage::BlobError::DeleteFailed(
                "injected failure".to_string(),
            ));
        }
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> BlobResult<bool> {
        self.inner.exists(key).await
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Memory
    }
}

pub struct RecordingDocumentStore {
    pub inner: MemoryDocumentStore,
    log: CallLog,
    /// Simulates losing the dedup race: the next `get` misses and the next
    /// `create` conflicts, as if a concurrent upload created the record in
    /// between.
    race_window: AtomicBool,
}

impl RecordingDocumentStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            log,
            race_window: AtomicBool::new(false),
        }
    }

    pub fn open_race_window(&self) {
        self.race_window.store(true, Ordering::SeqCst);
    }

    fn record(&self, name: &str) {
        self.log.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn get(&self, id: &str) -> DocResult<Option<ImageRecord>> {
        self.record("docs.get");
        if self.race_window.load(Ordering::SeqCst) {
            // The racing upload hasn't been observed yet.
            return Ok(None);
        }
        self.inner.get(id).await
    }

    async fn create(&self, record: &ImageRecord) -> DocResult<CreateOutcome> {
        self.record("docs.create");
        if self.race_window.swap(false, Ordering::SeqCst) {
            // The racing upload won the create; seed its record so the
            // conflict re-read finds it.
            self.inner.create(record).await?;
            return Ok(CreateOutcome::Conflict);
        }
        self.inner.create(record).await
    }

    async fn finish_extraction(&self, id: &str, update: &ExtractionUpdate) -> DocResult<bool> {
        self.record("docs.finish_extraction");
        self.inner.finish_extraction(id, update).await
    }

    async fn delete(&self, id: &str) -> DocResult<bool> {
        self.record("docs.delete");
        self.inner.delete(id).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DocResult<Vec<String>> {
        self.inner.delete_expired(now).await
    }
}

pub struct RecordingPurge {
    log: CallLog,
    fail: AtomicBool,
}

impl RecordingPurge {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_purges(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CachePurge for RecordingPurge {
    async fn invalidate(&self, _url: &str) -> Result<(), PurgeError> {
        self.log.lock().unwrap().push("purge.invalidate".to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(PurgeError::Upstream(503));
        }
        Ok(())
    }
}

/// Queue that records enqueues without delivering anything.
pub struct RecordingQueue {
    log: CallLog,
    fail: AtomicBool,
}

impl RecordingQueue {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_enqueues(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorkQueue for RecordingQueue {
    async fn enqueue(&self, _job: ExtractionJob) -> Result<(), QueueError> {
        self.log.lock().unwrap().push("queue.enqueue".to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::Full);
        }
        Ok(())
    }
}
