//! Image storage for point photos and catalog icons.
//!
//! Uploaded images are written under a single directory with a random,
//! token-based filename. The filename is the stored reference persisted in
//! `points.image` / `items.image`; [`ImageStore::resolve_url`] turns it into
//! a public URL under `{public_base_url}/uploads/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

/// Default maximum accepted upload size (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// URL path segment under which stored images are served.
pub const UPLOADS_PATH: &str = "uploads";

/// Length of the random token used for stored filenames.
pub const TOKEN_LENGTH: usize = 16;

/// Accepted file extensions (lowercase).
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Form field name of the image upload, used in field-level errors.
const IMAGE_FIELD: &str = "image";

/// An image received from a client, not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// MIME type as declared by the client, e.g. `image/png`.
    pub content_type: Option<String>,
    /// Original filename, used only for its extension.
    pub file_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("Image upload is empty")]
    Empty,

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image exceeds the maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageStoreError> for CoreError {
    fn from(err: ImageStoreError) -> Self {
        match err {
            ImageStoreError::Io(e) => CoreError::Storage(format!("image write failed: {e}")),
            other => CoreError::invalid_field(IMAGE_FIELD, other.to_string()),
        }
    }
}

/// Persists uploaded images and maps stored references to public URLs.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Validate and persist `upload`, returning the stored reference.
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageStoreError>;

    /// Map a stored reference to a publicly fetchable URL. Pure.
    fn resolve_url(&self, image_ref: &str) -> String;
}

/// [`ImageStore`] backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, ImageStoreError> {
        if upload.bytes.is_empty() {
            return Err(ImageStoreError::Empty);
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(ImageStoreError::TooLarge {
                max: self.max_bytes,
            });
        }

        let ext = image_extension(upload.content_type.as_deref(), upload.file_name.as_deref())?;
        let image_ref = format!("{}.{ext}", generate_token());

        tokio::fs::create_dir_all(&self.root).await?;

        // create_new: a token collision fails instead of overwriting.
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&image_ref))
            .await?;
        file.write_all(&upload.bytes).await?;
        file.flush().await?;

        Ok(image_ref)
    }

    fn resolve_url(&self, image_ref: &str) -> String {
        format!("{}/{UPLOADS_PATH}/{image_ref}", self.public_base_url)
    }
}

/// Pick the stored file extension.
///
/// The original filename wins when it carries an accepted extension;
/// otherwise the declared content type decides. A declared content type
/// outside `image/*` is always rejected.
fn image_extension(
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<&'static str, ImageStoreError> {
    if let Some(ct) = content_type {
        if !ct.starts_with("image/") {
            return Err(ImageStoreError::UnsupportedType(ct.to_string()));
        }
    }

    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().copied().find(|a| *a == ext));
    if let Some(ext) = from_name {
        return Ok(ext);
    }

    match content_type {
        Some("image/png") => Ok("png"),
        Some("image/jpeg") => Ok("jpg"),
        Some("image/gif") => Ok("gif"),
        Some("image/webp") => Ok("webp"),
        Some("image/svg+xml") => Ok("svg"),
        other => Err(ImageStoreError::UnsupportedType(
            other.or(file_name).unwrap_or("unknown").to_string(),
        )),
    }
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
