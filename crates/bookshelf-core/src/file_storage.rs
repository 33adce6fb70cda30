//! Avatar storage abstraction layer.
//!
//! Profile images are handed to an [`AvatarStorage`] backend which stores the
//! bytes and returns the public URL they are served from. Business logic only
//! persists that URL, so backends can be swapped without touching handlers.
//!
//! # Example
//!
//! ```ignore
//! use bookshelf_core::file_storage::{AvatarImage, AvatarStorage, ImageKind, LocalAvatarStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalAvatarStorage::new(
//!     PathBuf::from("./storage/avatars"),
//!     "http://localhost:3000/avatars".to_string(),
//! );
//!
//! let url = storage.upload(AvatarImage::new(bytes, ImageKind::Png)).await?;
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub const DEFAULT_MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AvatarImage {
    pub bytes: Vec<u8>,
    pub kind: ImageKind,
}

impl AvatarImage {
    pub fn new(bytes: Vec<u8>, kind: ImageKind) -> Self {
        Self { bytes, kind }
    }
}

/// Stores avatar images and returns the URL each one is reachable at.
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    async fn upload(&self, image: AvatarImage) -> Result<String, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("File is empty")]
    Empty,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the client sent something unacceptable, as opposed to the
    /// backend failing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::Empty)
    }
}

/// Stores avatars in a directory on the local filesystem.
///
/// The directory is expected to be served over HTTP under `base_url`.
#[derive(Debug, Clone)]
pub struct LocalAvatarStorage {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalAvatarStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_AVATAR_BYTES)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Rejects keys that could escape the storage directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with a path separator".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    pub fn url_for(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;

        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn upload(&self, image: AvatarImage) -> Result<String, StorageError> {
        if image.bytes.is_empty() {
            return Err(StorageError::Empty);
        }

        if image.bytes.len() > self.max_file_size {
            return Err(StorageError::TooLarge {
                max_bytes: self.max_file_size,
            });
        }

        let key = format!("{}.{}", Uuid::new_v4(), image.kind.extension());
        Self::validate_key(&key)?;

        fs::create_dir_all(&self.base_dir).await?;
        fs::write(self.base_dir.join(&key), &image.bytes).await?;

        tracing::debug!(key = %key, bytes = image.bytes.len(), "Stored avatar");

        self.url_for(&key)
    }
}
