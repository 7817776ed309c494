//! Record read service.

use std::sync::Arc;

use pixvault_core::{is_valid_hash, AppError, ImageRecord};
use pixvault_db::DocumentStore;

pub struct RecordService {
    docs: Arc<dyn DocumentStore>,
}

impl RecordService {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    /// Fetch the full record for an id.
    pub async fn get(&self, id: &str) -> Result<ImageRecord, AppError> {
        if !is_valid_hash(id) {
            return Err(AppError::InvalidInput(format!("Malformed image id '{}'", id)));
        }

        self.docs
            .get(id)
            .await
            .map_err(|e| AppError::Document(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("No image record for id '{}'", id)))
    }
}
