//! Edge cache purge client.
//!
//! Purges are best-effort and externally rate-limited, so the HTTP client
//! uses a short timeout. Deployments without a CDN run the no-op purger.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

const PURGE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("Purge request failed: {0}")]
    Request(String),

    #[error("Purge endpoint returned status {0}")]
    Upstream(u16),

    #[error("Purge configuration error: {0}")]
    Config(String),
}

/// Invalidate one URL at the edge cache.
#[async_trait]
pub trait CachePurge: Send + Sync {
    async fn invalidate(&self, url: &str) -> Result<(), PurgeError>;
}

/// HTTP purge client: POSTs the URL to the CDN's purge endpoint.
pub struct HttpCachePurge {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCachePurge {
    pub fn new(endpoint: String) -> Result<Self, PurgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PURGE_TIMEOUT_SECS))
            .build()
            .map_err(|e| PurgeError::Config(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl CachePurge for HttpCachePurge {
    async fn invalidate(&self, url: &str) -> Result<(), PurgeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| PurgeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PurgeError::Upstream(response.status().as_u16()));
        }

        tracing::debug!(url = %url, "Edge cache purged");
        Ok(())
    }
}

/// Purger for deployments without an edge cache. Always succeeds.
pub struct NoopCachePurge;

#[async_trait]
impl CachePurge for NoopCachePurge {
    async fn invalidate(&self, url: &str) -> Result<(), PurgeError> {
        tracing::debug!(url = %url, "No purge endpoint configured, skipping");
        Ok(())
    }
}
