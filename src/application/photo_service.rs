use crate::domain::error::DomainError;
use crate::infrastructure::blob_storage::{BlobStorage, RemoteFetcher, is_safe_file_name};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

const IMAGE_TYPES: [(&str, &str); 4] = [
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let mime = mime.split(';').next()?.trim();
    if mime.eq_ignore_ascii_case("image/jpg") {
        return Some("jpg");
    }
    IMAGE_TYPES
        .iter()
        .find(|(_, m)| m.eq_ignore_ascii_case(mime))
        .map(|(ext, _)| *ext)
}

fn extension_for_link(link: &str) -> &'static str {
    let path = link.split(['?', '#']).next().unwrap_or_default();
    let ext = path
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpeg") => "jpg",
        Some(ext) => IMAGE_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map_or("jpg", |(known, _)| *known),
        None => "jpg",
    }
}

/// Content type served for a stored file, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or("application/octet-stream", |(_, mime)| *mime)
}

pub struct PhotoService {
    storage: Arc<dyn BlobStorage>,
    fetcher: Arc<dyn RemoteFetcher>,
    max_bytes: usize,
}

impl PhotoService {
    pub fn new(
        storage: Arc<dyn BlobStorage>,
        fetcher: Arc<dyn RemoteFetcher>,
        max_bytes: usize,
    ) -> Self {
        Self {
            storage,
            fetcher,
            max_bytes,
        }
    }

    /// Stores an uploaded image body and returns its public URL.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, content_type: Option<&str>, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(DomainError::validation("Upload body is empty").into());
        }
        if bytes.len() > self.max_bytes {
            return Err(DomainError::validation("Upload is too large").into());
        }
        let ext = content_type.and_then(extension_for_mime).ok_or_else(|| {
            DomainError::validation("Upload must be a jpeg, png, webp or gif image")
        })?;

        let url = self.store(ext, bytes).await?;
        info!(url = %url, "Photo uploaded");
        Ok(url)
    }

    /// Downloads a photo from `link` and stores it.
    #[instrument(skip(self))]
    pub async fn upload_by_link(&self, link: &str) -> Result<String> {
        let link = link.trim();
        if link.is_empty() {
            return Err(DomainError::validation("link is required").into());
        }

        let bytes = self.fetcher.fetch(link).await?;
        if bytes.is_empty() {
            return Err(DomainError::validation("Linked file is empty").into());
        }

        let url = self.store(extension_for_link(link), &bytes).await?;
        info!(url = %url, "Photo uploaded from link");
        Ok(url)
    }

    pub async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        if !is_safe_file_name(file_name) {
            return Ok(None);
        }
        self.storage.read(file_name).await
    }

    async fn store(&self, ext: &str, bytes: &[u8]) -> Result<String> {
        let file_name = format!("photo-{}.{}", Uuid::new_v4(), ext);
        self.storage.upload(&file_name, bytes).await
    }
}
