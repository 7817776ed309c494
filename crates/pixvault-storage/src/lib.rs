//! Pixvault Storage Library
//!
//! Blob storage abstraction and implementations. Blobs are stored under
//! content-addressed keys (`images/{hash}`), so a write for an existing key
//! is always a byte-identical overwrite and never a corruption hazard.
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_blob_store;
pub use keys::blob_key;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
pub use pixvault_core::BlobBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3BlobStore;
pub use traits::{BlobError, BlobResult, BlobStore};
