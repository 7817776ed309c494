#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
use crate::MemoryBlobStore;
#[cfg(feature = "storage-s3")]
use crate::S3BlobStore;
use crate::{BlobBackend, BlobError, BlobResult, BlobStore};
use pixvault_core::Config;
use std::sync::Arc;

/// Create a blob store from configuration.
pub async fn create_blob_store(config: &Config) -> BlobResult<Arc<dyn BlobStore>> {
    match config.blob_backend {
        #[cfg(feature = "storage-local")]
        BlobBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                BlobError::Config("PIXVAULT_LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let store = LocalBlobStore::new(base_path).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        BlobBackend::Local => Err(BlobError::Config(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        BlobBackend::S3 => {
            let bucket = config.s3_bucket.clone().ok_or_else(|| {
                BlobError::Config("PIXVAULT_S3_BUCKET not configured".to_string())
            })?;
            let region = config.s3_region.clone().ok_or_else(|| {
                BlobError::Config("PIXVAULT_S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint.clone();

            let store = S3BlobStore::new(bucket, region, endpoint).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        BlobBackend::S3 => Err(BlobError::Config(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        BlobBackend::Memory => Ok(Arc::new(MemoryBlobStore::new())),
    }
}
