//! Shared key generation for blob backends.
//!
//! Key format: `images/{content_hash}`. All backends must use this format so
//! that a record's blob is addressable from the hash alone.

/// Generate the blob key for a content hash.
pub fn blob_key(id: &str) -> String {
    format!("images/{}", id)
}
