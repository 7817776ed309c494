//! Pixvault Worker Library
//!
//! The asynchronous half of the pipeline: the extraction queue and the
//! worker that resolves every job into exactly one terminal document write.

pub mod extractor;
pub mod queue;

pub use extractor::MetadataExtractionWorker;
pub use queue::{ExtractionQueue, QueueConfig, QueueError, WorkQueue};
