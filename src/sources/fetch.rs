//! HTTP fetch collaborator
//!
//! The pipeline core never performs I/O; this client fetches raw playlist
//! text and EPG bytes for the binary. No retries here — a failed source is
//! skipped by the caller.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::errors::{AppError, AppResult, SourceError};

pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Fetch a playlist document as text.
    pub async fn fetch_text(&self, url: &str) -> AppResult<String> {
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    /// Fetch an EPG document as raw bytes (may be gzip-compressed).
    pub async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.get(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get(&self, url: &str) -> AppResult<reqwest::Response> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::configuration(format!("invalid source URL '{url}': {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::configuration(format!(
                "source URL '{url}' must use HTTP or HTTPS"
            )));
        }

        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Source(SourceError::Timeout {
                    url: url.to_string(),
                })
            } else {
                AppError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Source(SourceError::Http {
                status: status.as_u16(),
                message: status.to_string(),
            }));
        }
        Ok(response)
    }
}
