//! Upload precondition checks.
//!
//! All checks run before any backend call; a rejected upload touches no
//! store, writes no record, and enqueues nothing.

use crate::error::AppError;

/// Validate the declared content type against the allow-list.
pub fn validate_content_type(content_type: &str, allowed: &[String]) -> Result<(), AppError> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if !allowed.iter().any(|ct| ct == &normalized) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported content type '{}'. Allowed: {}",
            content_type,
            allowed.join(", ")
        )));
    }
    Ok(())
}

/// Validate the upload body: non-empty and within the configured cap.
pub fn validate_body_size(len: usize, max_bytes: usize) -> Result<(), AppError> {
    if len == 0 {
        return Err(AppError::InvalidInput("Empty upload body".to_string()));
    }
    if len > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "Upload of {} bytes exceeds the {} byte limit",
            len, max_bytes
        )));
    }
    Ok(())
}
