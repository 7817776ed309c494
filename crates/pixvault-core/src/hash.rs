//! Content hashing
//!
//! Record ids are a pure function of the uploaded bytes: SHA-256 encoded with
//! URL-safe base64, no padding. Same bytes always produce the same id, which
//! is what makes upload deduplication and idempotent delete possible.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

/// Length of an encoded content hash: 256 bits / 6 bits per character,
/// unpadded.
pub const CONTENT_HASH_LEN: usize = 43;

/// Compute the canonical content id for a byte sequence.
pub fn content_hash(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(bytes))
}

/// Check that a string is a well-formed content id (length and alphabet).
///
/// Used by the delete path and the extraction worker to reject malformed ids
/// before any backend call.
pub fn is_valid_hash(id: &str) -> bool {
    id.len() == CONTENT_HASH_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = content_hash(b"hello world");
        let b = content_hash(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), CONTENT_HASH_LEN);
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(content_hash(b"hello"), content_hash(b"hello "));
        assert_ne!(content_hash(b""), content_hash(b"\0"));
    }

    #[test]
    fn test_hash_is_url_safe() {
        // Hashes go straight into URLs and storage keys; padding or '+'/'/'
        // would break both.
        let id = content_hash(&[0xffu8; 64]);
        assert!(is_valid_hash(&id));
        assert!(!id.contains('='));
        assert!(!id.contains('+'));
        assert!(!id.contains('/'));
    }

    #[test]
    fn test_is_valid_hash_rejects_malformed() {
        assert!(!is_valid_hash(""));
        assert!(!is_valid_hash("too-short"));
        assert!(!is_valid_hash(&"a".repeat(44)));
        assert!(!is_valid_hash(&format!("{}!", "a".repeat(42))));
    }
}
