//! One-shot download of the model artifact

use futures::StreamExt;
use herolens_core::{Error, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// What [`ArtifactFetcher::ensure`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was already on disk; no request was made
    Present,
    /// The file was downloaded
    Downloaded { bytes: u64 },
}

/// Downloads the model artifact if it is not already on disk
#[derive(Debug, Clone, Default)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
}

impl ArtifactFetcher {
    /// Create a fetcher with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher with a preconfigured HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Ensure `dest` exists, downloading `url` into it if it does not.
    ///
    /// Presence is the only check: the file is never re-validated. A failed
    /// download is not cleaned up, so a truncated file will count as present
    /// on the next call.
    pub async fn ensure(&self, url: &str, dest: &Path) -> Result<FetchOutcome> {
        if tokio::fs::try_exists(dest).await? {
            tracing::debug!("Artifact already present at {}", dest.display());
            return Ok(FetchOutcome::Present);
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!("Downloading artifact from {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("Failed to request {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::fetch(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::fetch(format!("Failed to read body of {}: {}", url, e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::info!("Downloaded {} bytes to {}", downloaded, dest.display());
        Ok(FetchOutcome::Downloaded { bytes: downloaded })
    }
}

/// Convenience wrapper around [`ArtifactFetcher::ensure`] with a default client
pub async fn ensure(url: &str, dest: &Path) -> Result<FetchOutcome> {
    ArtifactFetcher::new().ensure(url, dest).await
}
