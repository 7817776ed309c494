//! In-memory document store for tests and ephemeral local runs.
//!
//! Implements the same contract as the Postgres store: atomic create (one
//! winner under the map lock) and the only-if-processing extraction guard.

use crate::traits::{CreateOutcome, DocResult, DocumentStore, ExtractionUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pixvault_core::models::{ImageRecord, ImageStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    records: Arc<Mutex<HashMap<String, ImageRecord>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (test helper).
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: &str) -> DocResult<Option<ImageRecord>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, record: &ImageRecord) -> DocResult<CreateOutcome> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.id) {
            return Ok(CreateOutcome::Conflict);
        }
        records.insert(record.id.clone(), record.clone());
        Ok(CreateOutcome::Created)
    }

    async fn finish_extraction(&self, id: &str, update: &ExtractionUpdate) -> DocResult<bool> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(id) {
            Some(record) if record.status == ImageStatus::Processing => {
                record.status = update.status;
                record.width = update.width;
                record.height = update.height;
                record.exif = update.exif.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> DocResult<bool> {
        Ok(self.records.lock().unwrap().remove(id).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DocResult<Vec<String>> {
        let mut records = self.records.lock().unwrap();
        let expired: Vec<String> = records
            .values()
            .filter(|r| r.expires_at() <= now)
            .map(|r| r.id.clone())
            .collect();
        for id in &expired {
            records.remove(id);
        }
        Ok(expired)
    }
}
