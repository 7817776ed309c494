//! Pixvault Core Library
//!
//! This crate provides the shared domain models, error taxonomy, content
//! hashing, validation, and configuration used by all Pixvault components.

pub mod config;
pub mod constants;
pub mod error;
pub mod hash;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{BlobBackend, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hash::{content_hash, is_valid_hash, CONTENT_HASH_LEN};
pub use models::{ExifData, ExtractionJob, GeoPoint, ImageRecord, ImageStatus};
