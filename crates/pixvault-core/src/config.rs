//! Configuration module
//!
//! Env-driven configuration for the orchestration core and its backends.
//! All knobs have defaults suitable for local development; production
//! deployments set the `PIXVAULT_*` variables explicitly.

use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_QUEUE_CAPACITY, DEFAULT_TTL_SECONDS,
    DEFAULT_WORKER_CONCURRENCY, SUPPORTED_CONTENT_TYPES,
};

/// Blob storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBackend {
    Local,
    S3,
    Memory,
}

impl FromStr for BlobBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(BlobBackend::Local),
            "s3" => Ok(BlobBackend::S3),
            "memory" => Ok(BlobBackend::Memory),
            other => Err(format!("Unknown storage backend '{}'", other)),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL records derive their public URL from.
    pub public_base_url: String,
    pub blob_backend: BlobBackend,
    pub local_storage_path: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...).
    pub s3_endpoint: Option<String>,
    pub database_url: Option<String>,
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
    /// Retention window stamped on every record, in seconds.
    pub ttl_seconds: i64,
    /// CDN purge endpoint; when unset, purges are a logged no-op.
    pub purge_endpoint: Option<String>,
    pub queue_capacity: usize,
    pub worker_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let blob_backend = env::var("PIXVAULT_STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<BlobBackend>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let allowed_content_types = env::var("PIXVAULT_ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| SUPPORTED_CONTENT_TYPES.join(","))
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "PIXVAULT_ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        Ok(Config {
            public_base_url: env::var("PIXVAULT_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/images".to_string()),
            blob_backend,
            local_storage_path: env::var("PIXVAULT_LOCAL_STORAGE_PATH").ok(),
            s3_bucket: env::var("PIXVAULT_S3_BUCKET").ok(),
            s3_region: env::var("PIXVAULT_S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("PIXVAULT_S3_ENDPOINT").ok(),
            database_url: env::var("DATABASE_URL").ok(),
            max_upload_bytes: env::var("PIXVAULT_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            allowed_content_types,
            ttl_seconds: env::var("PIXVAULT_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECONDS),
            purge_endpoint: env::var("PIXVAULT_PURGE_ENDPOINT").ok(),
            queue_capacity: env::var("PIXVAULT_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY)
                .max(1),
            worker_concurrency: env::var("PIXVAULT_WORKER_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WORKER_CONCURRENCY)
                .max(1),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.blob_backend {
            BlobBackend::Local if self.local_storage_path.is_none() => Err(anyhow::anyhow!(
                "PIXVAULT_LOCAL_STORAGE_PATH must be set for the local backend"
            )),
            BlobBackend::S3 if self.s3_bucket.is_none() => Err(anyhow::anyhow!(
                "PIXVAULT_S3_BUCKET must be set for the s3 backend"
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("local".parse::<BlobBackend>().unwrap(), BlobBackend::Local);
        assert_eq!("S3".parse::<BlobBackend>().unwrap(), BlobBackend::S3);
        assert!("gcs".parse::<BlobBackend>().is_err());
    }
}
