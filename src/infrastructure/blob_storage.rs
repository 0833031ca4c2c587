//! Photo storage collaborators: a local-disk blob store and an HTTP fetcher
//! for "upload by link".

use crate::domain::error::DomainError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `bytes` under `file_name` and returns the public URL.
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
    /// Reads a previously stored blob. `None` when it does not exist.
    async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>>;
}

#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// A single path segment without separators or parent references.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

pub struct LocalBlobStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        if !is_safe_file_name(file_name) {
            return Err(DomainError::validation(format!("Invalid file name: {}", file_name)).into());
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let path = self.path_for(file_name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Blob written");
        Ok(format!("{}/uploads/{}", self.public_base_url, file_name))
    }

    async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(file_name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            max_bytes,
        }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DomainError::validation("Link must be an http(s) URL").into());
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Remote photo fetch failed");
            return Err(
                DomainError::validation(format!("Link responded with status {}", status)).into(),
            );
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(DomainError::validation("Linked file is too large").into());
        }

        let bytes = response.bytes().await.context("failed to read remote body")?;
        if bytes.len() > self.max_bytes {
            return Err(DomainError::validation("Linked file is too large").into());
        }
        Ok(bytes.to_vec())
    }
}
