//! Queue message for deferred metadata extraction.

use serde::{Deserialize, Serialize};

/// Extraction job referencing an existing image record by content hash.
///
/// Ephemeral; carries no identity beyond the queue's own delivery semantics.
/// Wire shape: `{"hash": "<id>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionJob {
    pub hash: String,
}

impl ExtractionJob {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}
