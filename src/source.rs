/*!
 * Caption source acquisition.
 *
 * The pipeline only needs "give me the text at this location". Locations
 * are either `http(s)://` URLs or local paths (plain or `file://`).
 */

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Request timeout for caption downloads, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Fetches the raw text of a caption track
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Return the full text found at `location`
    async fn fetch_text(&self, location: &str) -> Result<String>;
}

/// Fetches captions over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout_secs: u64) -> Self {
        let timeout = Duration::from_secs(timeout_secs);
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            timeout,
        }
    }

    /// Request timeout in use
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT_SECS)
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        debug!("Fetching captions from {}", location);
        let response = self.client.get(location)
            .send()
            .await
            .with_context(|| format!("Failed to fetch captions from {}", location))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Caption fetch failed ({}): {}", status, location));
        }

        response.text().await
            .with_context(|| format!("Failed to read caption body from {}", location))
    }
}

/// Reads captions from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl SourceFetcher for FileFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        let path = local_path(location)?;
        debug!("Reading captions from {}", path.display());
        tokio::fs::read_to_string(&path).await
            .with_context(|| format!("Failed to read caption file: {}", path.display()))
    }
}

/// Where a caption location points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `http://` or `https://`
    Remote,
    /// A filesystem path or `file://` URL
    Local,
}

/// Classify a location by its URL scheme; anything that is not a URL is a path
pub fn classify(location: &str) -> Result<SourceKind> {
    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(SourceKind::Remote),
            "file" => Ok(SourceKind::Local),
            // Windows drive letters parse as a one-letter scheme
            scheme if scheme.len() == 1 => Ok(SourceKind::Local),
            scheme => Err(anyhow!("Unsupported caption source scheme: {}", scheme)),
        },
        Err(_) => Ok(SourceKind::Local),
    }
}

fn local_path(location: &str) -> Result<PathBuf> {
    match Url::parse(location) {
        Ok(url) if url.scheme() == "file" => url.to_file_path()
            .map_err(|_| anyhow!("Invalid file URL: {}", location)),
        _ => Ok(PathBuf::from(location)),
    }
}

/// Pick a fetcher able to read `location`
pub fn fetcher_for(location: &str, timeout_secs: u64) -> Result<Box<dyn SourceFetcher>> {
    Ok(match classify(location)? {
        SourceKind::Remote => Box::new(HttpFetcher::new(timeout_secs)),
        SourceKind::Local => Box::new(FileFetcher),
    })
}
