//! End-to-end orchestration tests over in-memory backends.

mod helpers;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use pixvault_core::models::ImageStatus;
use pixvault_core::{content_hash, AppError};
use pixvault_db::{DocumentStore, MemoryDocumentStore};
use pixvault_services::{
    DeleteOrchestrator, DeleteOutcome, RecordService, UploadConfig, UploadOrchestrator,
};
use pixvault_storage::{blob_key, BlobStore, MemoryBlobStore};
use pixvault_worker::{ExtractionQueue, MetadataExtractionWorker, QueueConfig};

use helpers::*;

fn test_upload_config() -> UploadConfig {
    UploadConfig {
        base_url: "http://localhost:8080/images".to_string(),
        max_upload_bytes: 10 * 1024 * 1024,
        allowed_content_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
            "image/gif".to_string(),
        ],
        ttl_seconds: 3600,
    }
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 90, 160, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

struct Fixture {
    log: CallLog,
    blobs: Arc<RecordingBlobStore>,
    docs: Arc<RecordingDocumentStore>,
    queue: Arc<RecordingQueue>,
    purge: Arc<RecordingPurge>,
    uploads: UploadOrchestrator,
    deletes: DeleteOrchestrator,
}

fn fixture() -> Fixture {
    let log = new_call_log();
    let blobs = Arc::new(RecordingBlobStore::new(log.clone()));
    let docs = Arc::new(RecordingDocumentStore::new(log.clone()));
    let queue = Arc::new(RecordingQueue::new(log.clone()));
    let purge = Arc::new(RecordingPurge::new(log.clone()));
    let config = test_upload_config();

    let uploads = UploadOrchestrator::new(
        blobs.clone(),
        docs.clone(),
        queue.clone(),
        config.clone(),
    );
    let deletes = DeleteOrchestrator::new(
        blobs.clone(),
        docs.clone(),
        purge.clone(),
        config.base_url.clone(),
    );

    Fixture {
        log,
        blobs,
        docs,
        queue,
        purge,
        uploads,
        deletes,
    }
}

#[tokio::test]
async fn test_upload_stores_blob_and_record_and_enqueues() {
    let f = fixture();
    let data = png_fixture(8, 8);
    let id = content_hash(&data);

    let outcome = f.uploads.upload(data.clone(), "image/png").await.unwrap();

    assert!(outcome.is_new);
    assert_eq!(outcome.record.id, id);
    assert_eq!(outcome.record.status, ImageStatus::Processing);
    assert_eq!(outcome.record.size, data.len() as i64);
    assert!(outcome.record.width.is_none());
    assert!(outcome.record.url.ends_with(&id));

    assert_eq!(count_of(&f.log, "blob.put"), 1);
    assert_eq!(count_of(&f.log, "docs.create"), 1);
    assert_eq!(count_of(&f.log, "queue.enqueue"), 1);
    assert!(f.blobs.inner.exists(&blob_key(&id)).await.unwrap());
}

#[tokio::test]
async fn test_reupload_same_bytes_is_deduplicated() {
    let f = fixture();
    let data = png_fixture(8, 8);

    let first = f.uploads.upload(data.clone(), "image/png").await.unwrap();
    let second = f.uploads.upload(data, "image/png").await.unwrap();

    assert!(first.is_new);
    assert!(!second.is_new);
    assert_eq!(first.record.id, second.record.id);

    // The second call does nothing beyond the dedup point read.
    assert_eq!(count_of(&f.log, "blob.put"), 1);
    assert_eq!(count_of(&f.log, "docs.create"), 1);
    assert_eq!(count_of(&f.log, "queue.enqueue"), 1);
}

#[tokio::test]
async fn test_upload_rejections_touch_no_backend() {
    let f = fixture();
    let data = png_fixture(8, 8);

    let err = f
        .uploads
        .upload(data.clone(), "application/pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = f.uploads.upload(Vec::new(), "image/png").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let mut config = test_upload_config();
    config.max_upload_bytes = 16;
    let small = UploadOrchestrator::new(
        f.blobs.clone(),
        f.docs.clone(),
        f.queue.clone(),
        config,
    );
    let err = small.upload(data, "image/png").await.unwrap_err();
    assert!(matches!(err, AppError::PayloadTooLarge(_)));

    assert!(calls(&f.log).is_empty());
}

#[tokio::test]
async fn test_content_type_parameters_are_accepted() {
    let f = fixture();
    let outcome = f
        .uploads
        .upload(png_fixture(8, 8), "IMAGE/PNG; charset=binary")
        .await
        .unwrap();
    assert!(outcome.is_new);
}

#[tokio::test]
async fn test_enqueue_failure_does_not_fail_upload() {
    let f = fixture();
    f.queue.fail_enqueues();

    let outcome = f.uploads.upload(png_fixture(8, 8), "image/png").await.unwrap();

    assert!(outcome.is_new);
    assert_eq!(outcome.record.status, ImageStatus::Processing);
    assert_eq!(count_of(&f.log, "blob.put"), 1);
    assert_eq!(count_of(&f.log, "docs.create"), 1);
}

#[tokio::test]
async fn test_create_conflict_is_treated_as_dedup() {
    let f = fixture();
    f.docs.open_race_window();

    let data = png_fixture(8, 8);
    let id = content_hash(&data);
    let outcome = f.uploads.upload(data, "image/png").await.unwrap();

    assert!(!outcome.is_new);
    assert_eq!(outcome.record.id, id);
    // The loser still wrote its (identical) blob before hitting the conflict.
    assert_eq!(count_of(&f.log, "blob.put"), 1);
    assert_eq!(count_of(&f.log, "queue.enqueue"), 0);
}

#[tokio::test]
async fn test_delete_runs_blob_then_doc_then_purge() {
    let f = fixture();
    let data = png_fixture(8, 8);
    let id = content_hash(&data);
    f.uploads.upload(data, "image/png").await.unwrap();
    f.log.lock().unwrap().clear();

    let outcome = f.deletes.delete(&id).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Completed);
    assert_eq!(
        calls(&f.log),
        vec!["blob.delete", "docs.delete", "purge.invalidate"]
    );
    assert!(!f.blobs.inner.exists(&blob_key(&id)).await.unwrap());
    assert!(f.docs.inner.get(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_of_unknown_id_is_idempotent_success() {
    let f = fixture();
    let id = content_hash(b"never uploaded");

    let outcome = f.deletes.delete(&id).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Completed);
    assert_eq!(
        calls(&f.log),
        vec!["blob.delete", "docs.delete", "purge.invalidate"]
    );
}

#[tokio::test]
async fn test_delete_rejects_malformed_id_before_any_backend_call() {
    let f = fixture();

    let err = f.deletes.delete("../../etc/passwd").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(calls(&f.log).is_empty());
}

#[tokio::test]
async fn test_purge_failure_is_partial_not_rolled_back() {
    let f = fixture();
    let data = png_fixture(8, 8);
    let id = content_hash(&data);
    f.uploads.upload(data, "image/png").await.unwrap();
    f.purge.fail_purges();
    f.log.lock().unwrap().clear();

    let outcome = f.deletes.delete(&id).await.unwrap();

    assert!(matches!(outcome, DeleteOutcome::PurgeFailed { .. }));
    // Storage-side removal happened and stays removed.
    assert_eq!(
        calls(&f.log),
        vec!["blob.delete", "docs.delete", "purge.invalidate"]
    );
    assert!(!f.blobs.inner.exists(&blob_key(&id)).await.unwrap());
    assert!(f.docs.inner.get(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_blob_delete_failure_still_runs_remaining_steps() {
    let f = fixture();
    let data = png_fixture(8, 8);
    let id = content_hash(&data);
    f.uploads.upload(data, "image/png").await.unwrap();
    f.blobs.fail_deletes();
    f.log.lock().unwrap().clear();

    let err = f.deletes.delete(&id).await.unwrap_err();

    assert!(matches!(err, AppError::Storage(_)));
    // The later steps ran anyway; the record is gone even though the blob
    // delete failed.
    assert_eq!(
        calls(&f.log),
        vec!["blob.delete", "docs.delete", "purge.invalidate"]
    );
    assert!(f.docs.inner.get(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_backend_and_purge_failures_report_backend_error() {
    let f = fixture();
    let data = png_fixture(8, 8);
    let id = content_hash(&data);
    f.uploads.upload(data, "image/png").await.unwrap();
    f.blobs.fail_deletes();
    f.purge.fail_purges();
    f.log.lock().unwrap().clear();

    let err = f.deletes.delete(&id).await.unwrap_err();

    // The backend error wins, but the purge still ran and its failure is
    // not allowed to abort the earlier steps.
    assert!(matches!(err, AppError::Storage(_)));
    assert_eq!(
        calls(&f.log),
        vec!["blob.delete", "docs.delete", "purge.invalidate"]
    );
    assert!(f.docs.inner.get(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_record_service_not_found_and_invalid() {
    let docs = Arc::new(MemoryDocumentStore::new());
    let records = RecordService::new(docs);

    let err = records.get("not-a-hash!").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = records.get(&content_hash(b"missing")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

/// Full pipeline: upload through the real queue and worker, then poll until
/// the record reaches `ready` with numeric dimensions.
#[tokio::test]
async fn test_upload_reaches_ready_through_extraction_pipeline() {
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
    let docs: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let worker = Arc::new(MetadataExtractionWorker::new(blobs.clone(), docs.clone()));
    let queue = Arc::new(ExtractionQueue::new(worker, QueueConfig::default()));
    let uploads = UploadOrchestrator::new(
        blobs.clone(),
        docs.clone(),
        queue,
        test_upload_config(),
    );

    let data = png_fixture(24, 16);
    let outcome = uploads.upload(data, "image/png").await.unwrap();
    assert_eq!(outcome.record.status, ImageStatus::Processing);
    let id = outcome.record.id.clone();

    let mut record = None;
    for _ in 0..100 {
        let current = docs.get(&id).await.unwrap().unwrap();
        if current.status.is_terminal() {
            record = Some(current);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let record = record.expect("extraction did not finish in time");
    assert_eq!(record.status, ImageStatus::Ready);
    assert_eq!(record.width, Some(24));
    assert_eq!(record.height, Some(16));
    assert!(record.exif.is_none());
}
