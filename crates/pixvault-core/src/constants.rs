//! Shared constants for upload limits and retention.

/// Content types accepted by the upload path. Everything else is rejected
/// before any backend is touched.
pub const SUPPORTED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Default hard cap on upload body size (bytes).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default retention window applied to every record (seconds). 30 days.
pub const DEFAULT_TTL_SECONDS: i64 = 30 * 24 * 3600;

/// Default bound on the in-process extraction queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default number of concurrent extraction workers.
pub const DEFAULT_WORKER_CONCURRENCY: usize = 4;
