//! Pixvault Services Library
//!
//! The synchronous half of the pipeline: upload and delete orchestration,
//! record reads, cache purging, and the retention sweep. These services own
//! no durable state; they coordinate the blob store, the document store, and
//! the extraction queue.

pub mod cleanup;
pub mod delete;
pub mod purge;
pub mod records;
pub mod upload;

pub use cleanup::CleanupService;
pub use delete::{DeleteOrchestrator, DeleteOutcome};
pub use purge::{CachePurge, HttpCachePurge, NoopCachePurge, PurgeError};
pub use records::RecordService;
pub use upload::{UploadConfig, UploadOrchestrator, UploadOutcome};
