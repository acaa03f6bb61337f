use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Retrieves the result document a finished job points at.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<Bytes>;
}

pub struct HttpTranscriptFetcher {
    client: reqwest::Client,
}

impl HttpTranscriptFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TranscriptFetcher for HttpTranscriptFetcher {
    async fn fetch(&self, uri: &str) -> Result<Bytes> {
        // The URI is pre-signed; never log its query string.
        let display_uri = uri.split('?').next().unwrap_or_default();

        let body = self
            .client
            .get(uri)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .with_context(|| format!("GET {} failed", display_uri))?
            .bytes()
            .await
            .with_context(|| format!("Reading body of {} failed", display_uri))?;

        tracing::debug!("📄 Fetched transcript document ({} bytes)", body.len());
        Ok(body)
    }
}
