//! Image record model
//!
//! One record per unique content hash. The record is created in `processing`
//! and transitions exactly once, to `ready` (with metadata) or `failed`
//! (without). Both end states are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Processing,
    Ready,
    Failed,
}

impl ImageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStatus::Processing => "processing",
            ImageStatus::Ready => "ready",
            ImageStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(ImageStatus::Processing),
            "ready" => Some(ImageStatus::Ready),
            "failed" => Some(ImageStatus::Failed),
            _ => None,
        }
    }

    /// Whether the record can still be mutated by the extraction worker.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImageStatus::Processing)
    }
}

impl std::fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GPS position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// EXIF metadata extracted from the original upload.
///
/// Every field is independently optional: partial EXIF is normal, not an
/// error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExifData {
    /// Original capture time, if the image carried one.
    pub created: Option<DateTime<Utc>>,
    /// Capture location, if GPS tags were present and complete.
    pub location: Option<GeoPoint>,
    /// Camera model string.
    pub camera: Option<String>,
}

impl ExifData {
    /// True when no field carries a value. Callers store `None` instead of an
    /// all-empty structure.
    pub fn is_empty(&self) -> bool {
        self.created.is_none() && self.location.is_none() && self.camera.is_none()
    }
}

/// Canonical metadata record, one per unique content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Content hash of the original bytes. Immutable.
    pub id: String,
    /// Public URL, derived from the base URL and `id`.
    pub url: String,
    pub status: ImageStatus,
    /// Byte length of the original upload.
    pub size: i64,
    pub content_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub exif: Option<ExifData>,
    pub created_at: DateTime<Utc>,
    /// Retention window in seconds, counted from `created_at`.
    pub ttl: i64,
}

impl ImageRecord {
    /// Build a fresh record in `processing` state with no extracted metadata.
    pub fn new(
        id: String,
        base_url: &str,
        size: i64,
        content_type: String,
        ttl_seconds: i64,
    ) -> Self {
        let url = derive_url(base_url, &id);
        Self {
            id,
            url,
            status: ImageStatus::Processing,
            size,
            content_type,
            width: None,
            height: None,
            exif: None,
            created_at: Utc::now(),
            ttl: ttl_seconds,
        }
    }

    /// Moment after which the record may be expired by the retention sweep.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + chrono::Duration::seconds(self.ttl)
    }
}

/// Derive the public URL for a content id.
pub fn derive_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}
