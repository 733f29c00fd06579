//! Backend collaborator abstraction and the HTTP implementation.
//!
//! The workbench controller only ever sees the four logical operations in
//! [`RagBackend`]; everything about transport (URLs, JSON encoding,
//! timeouts, retries) lives in [`HttpBackend`]. This keeps the controller
//! testable against an in-memory mock.
//!
//! # Retry Strategy
//!
//! [`HttpBackend`] retries transient failures with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::models::{HealthStatus, IndexReceipt, IndexStats, QueryResult};

/// The four remote operations the workbench orchestrates.
///
/// Implementations must be safe to share across tasks. Timeouts and
/// retries are an implementation concern; callers treat each operation as
/// a single async call that either settles with a value or an error.
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// Index an ordered batch of documents. Returns how many were indexed
    /// by this call and the new running total.
    async fn index_documents(&self, documents: &[String]) -> Result<IndexReceipt>;

    /// Answer `text` using the `top_k` most relevant indexed passages.
    async fn query(&self, text: &str, top_k: usize) -> Result<QueryResult>;

    /// Fetch current index statistics.
    async fn stats(&self) -> Result<IndexStats>;

    /// Remove every document from the index.
    async fn clear(&self) -> Result<()>;
}

/// HTTP client for the workbench server's JSON API.
///
/// # Endpoints
///
/// | Method | Path | Operation |
/// |--------|------|-----------|
/// | `POST` | `/api/rag/index` | [`RagBackend::index_documents`] |
/// | `POST` | `/api/rag/query` | [`RagBackend::query`] |
/// | `GET`  | `/api/rag/stats` | [`RagBackend::stats`] |
/// | `POST` | `/api/rag/clear` | [`RagBackend::clear`] |
/// | `GET`  | `/health` | [`HttpBackend::health`] |
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpBackend {
    /// Build a client from configuration.
    ///
    /// The per-request timeout is applied here, on the transport; the
    /// controller deliberately enforces none of its own.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check whether the backend is reachable and healthy.
    pub async fn health(&self) -> Result<HealthStatus> {
        let request = self.client.get(self.url("/health"));
        self.send(request).await
    }

    /// Send a request with retry/backoff and decode the JSON response.
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let Some(request) = request.try_clone() else {
                bail!("request body is not retryable");
            };

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.json().await?);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!("backend error {}: {}", status, body));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body = response.text().await.unwrap_or_default();
                    bail!("backend error {}: {}", status, body);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("request failed after retries")))
    }
}

#[async_trait]
impl RagBackend for HttpBackend {
    async fn index_documents(&self, documents: &[String]) -> Result<IndexReceipt> {
        let body = serde_json::json!({ "documents": documents });
        let request = self.client.post(self.url("/api/rag/index")).json(&body);
        self.send(request).await
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<QueryResult> {
        let body = serde_json::json!({ "query": text, "top_k": top_k });
        let request = self.client.post(self.url("/api/rag/query")).json(&body);
        self.send(request).await
    }

    async fn stats(&self) -> Result<IndexStats> {
        let request = self.client.get(self.url("/api/rag/stats"));
        self.send(request).await
    }

    async fn clear(&self) -> Result<()> {
        let request = self.client.post(self.url("/api/rag/clear"));
        let _ack: serde_json::Value = self.send(request).await?;
        Ok(())
    }
}
