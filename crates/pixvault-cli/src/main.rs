//! Pixvault CLI — content-addressed image store client.
//!
//! Configuration comes from PIXVAULT_* environment variables (and .env);
//! see `Config`. Without DATABASE_URL the CLI runs against an in-memory
//! document store, which only makes sense for smoke testing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pixvault_cli::{guess_content_type, init_tracing};
use pixvault_core::Config;
use pixvault_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use pixvault_services::{
    CachePurge, CleanupService, DeleteOrchestrator, DeleteOutcome, HttpCachePurge, NoopCachePurge,
    RecordService, UploadConfig, UploadOrchestrator,
};
use pixvault_storage::create_blob_store;
use pixvault_worker::{ExtractionQueue, MetadataExtractionWorker, QueueConfig};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "pixvault", about = "Content-addressed image store CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest an image file and wait for metadata extraction
    Ingest {
        /// Path to the image file
        file: std::path::PathBuf,
        /// Content type; inferred from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
        /// Return immediately without waiting for extraction
        #[arg(long)]
        no_wait: bool,
    },
    /// Get an image record by content hash
    Get {
        /// Content hash id
        id: String,
    },
    /// Delete an image everywhere (blob, record, edge cache)
    Delete {
        /// Content hash id
        id: String,
    },
    /// Run one retention sweep, removing expired images
    Gc,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn build_document_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(10))
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            PgDocumentStore::migrate(&pool)
                .await
                .context("Failed to run database migrations")?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory document store");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

fn build_purge(config: &Config) -> anyhow::Result<Arc<dyn CachePurge>> {
    match &config.purge_endpoint {
        Some(endpoint) => Ok(Arc::new(HttpCachePurge::new(endpoint.clone())?)),
        None => Ok(Arc::new(NoopCachePurge)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    config.validate()?;

    let blobs = create_blob_store(&config)
        .await
        .context("Failed to create blob store")?;
    let docs = build_document_store(&config).await?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            file,
            content_type,
            no_wait,
        } => {
            let content_type = match content_type {
                Some(ct) => ct,
                None => guess_content_type(&file)
                    .context("Cannot infer content type from extension, pass --content-type")?
                    .to_string(),
            };
            let data = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let worker = Arc::new(MetadataExtractionWorker::new(blobs.clone(), docs.clone()));
            let queue = Arc::new(ExtractionQueue::new(
                worker,
                QueueConfig {
                    capacity: config.queue_capacity,
                    max_concurrent: config.worker_concurrency,
                },
            ));
            let uploads = UploadOrchestrator::new(
                blobs,
                docs.clone(),
                queue,
                UploadConfig::from_config(&config),
            );

            let outcome = uploads.upload(data, &content_type).await?;
            if !outcome.is_new {
                tracing::info!(id = %outcome.record.id, "Content already stored");
            }

            let record = if no_wait {
                outcome.record
            } else {
                wait_for_extraction(docs.as_ref(), &outcome.record.id).await?
            };
            print_json(&record)?;
        }
        Commands::Get { id } => {
            let record = RecordService::new(docs).get(&id).await?;
            print_json(&record)?;
        }
        Commands::Delete { id } => {
            let purge = build_purge(&config)?;
            let deletes =
                DeleteOrchestrator::new(blobs, docs, purge, config.public_base_url.clone());
            match deletes.delete(&id).await? {
                DeleteOutcome::Completed => {
                    println!("deleted {}", id);
                }
                DeleteOutcome::PurgeFailed { detail } => {
                    println!("deleted {} (cache purge failed: {})", id, detail);
                }
            }
        }
        Commands::Gc => {
            let cleanup = CleanupService::new(docs, blobs);
            let removed = cleanup.run_once().await?;
            println!("removed {} expired image(s)", removed);
        }
    }

    Ok(())
}

/// Poll the document store until the record leaves `processing`.
async fn wait_for_extraction(
    docs: &dyn DocumentStore,
    id: &str,
) -> anyhow::Result<pixvault_core::ImageRecord> {
    const POLL_INTERVAL_MS: u64 = 50;
    const MAX_ATTEMPTS: u32 = 200;

    for _ in 0..MAX_ATTEMPTS {
        let record = docs
            .get(id)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?
            .context("Record disappeared while waiting for extraction")?;
        if record.status.is_terminal() {
            return Ok(record);
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }

    anyhow::bail!("Timed out waiting for metadata extraction of {}", id)
}
