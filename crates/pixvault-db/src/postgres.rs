//! Postgres-backed document store.
//!
//! Postgres has no native TTL, so retention is enforced by the cleanup
//! sweep via `delete_expired`.

use crate::traits::{
    CreateOutcome, DocResult, DocStoreError, DocumentStore, ExtractionUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pixvault_core::models::{ExifData, ImageRecord, ImageStatus};
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ImageRecordRow {
    id: String,
    url: String,
    status: String,
    size: i64,
    content_type: String,
    width: Option<i32>,
    height: Option<i32>,
    exif: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    ttl_seconds: i64,
}

impl ImageRecordRow {
    fn into_record(self) -> DocResult<ImageRecord> {
        let status = ImageStatus::parse(&self.status).ok_or_else(|| {
            DocStoreError::Serialization(format!("Unknown status '{}'", self.status))
        })?;
        let exif: Option<ExifData> = match self.exif {
            Some(value) => Some(
                serde_json::from_value(value)
                    .map_err(|e| DocStoreError::Serialization(e.to_string()))?,
            ),
            None => None,
        };
        Ok(ImageRecord {
            id: self.id,
            url: self.url,
            status,
            size: self.size,
            content_type: self.content_type,
            width: self.width,
            height: self.height,
            exif,
            created_at: self.created_at,
            ttl: self.ttl_seconds,
        })
    }
}

fn exif_to_json(exif: &Option<ExifData>) -> DocResult<Option<serde_json::Value>> {
    exif.as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| DocStoreError::Serialization(e.to_string()))
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run embedded migrations. Called once at startup.
    pub async fn migrate(pool: &PgPool) -> DocResult<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| DocStoreError::Config(format!("Migration failed: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(skip(self), fields(db.table = "image_records", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: &str) -> DocResult<Option<ImageRecord>> {
        let row = sqlx::query_as::<Postgres, ImageRecordRow>(
            r#"
            SELECT id, url, status, size, content_type, width, height, exif,
                   created_at, ttl_seconds
            FROM image_records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DocStoreError::Backend(e.to_string()))?;

        row.map(ImageRecordRow::into_record).transpose()
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "image_records", db.operation = "insert", db.record_id = %record.id))]
    async fn create(&self, record: &ImageRecord) -> DocResult<CreateOutcome> {
        let exif = exif_to_json(&record.exif)?;

        let result = sqlx::query(
            r#"
            INSERT INTO image_records (
                id, url, status, size, content_type, width, height, exif,
                created_at, ttl_seconds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&record.id)
        .bind(&record.url)
        .bind(record.status.as_str())
        .bind(record.size)
        .bind(&record.content_type)
        .bind(record.width)
        .bind(record.height)
        .bind(exif)
        .bind(record.created_at)
        .bind(record.ttl)
        .execute(&self.pool)
        .await
        .map_err(|e| DocStoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            tracing::debug!("Insert hit existing record, reporting conflict");
            Ok(CreateOutcome::Conflict)
        } else {
            Ok(CreateOutcome::Created)
        }
    }

    #[tracing::instrument(skip(self, update), fields(db.table = "image_records", db.operation = "update", db.record_id = %id, status = %update.status))]
    async fn finish_extraction(&self, id: &str, update: &ExtractionUpdate) -> DocResult<bool> {
        let exif = exif_to_json(&update.exif)?;

        // The status predicate makes the transition atomic: once a record is
        // terminal, re-delivered jobs update zero rows.
        let result = sqlx::query(
            r#"
            UPDATE image_records
            SET status = $2, width = $3, height = $4, exif = $5
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id)
        .bind(update.status.as_str())
        .bind(update.width)
        .bind(update.height)
        .bind(exif)
        .execute(&self.pool)
        .await
        .map_err(|e| DocStoreError::Backend(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_records", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: &str) -> DocResult<bool> {
        let result = sqlx::query("DELETE FROM image_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DocStoreError::Backend(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "image_records", db.operation = "delete"))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> DocResult<Vec<String>> {
        let ids: Vec<(String,)> = sqlx::query_as(
            r#"
            DELETE FROM image_records
            WHERE created_at + ttl_seconds * interval '1 second' <= $1
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DocStoreError::Backend(e.to_string()))?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
