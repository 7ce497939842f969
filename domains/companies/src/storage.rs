//! Company logo storage
//!
//! Logos are stored under `company_logos/{slug}.{ext}` relative to a media
//! root. The stored key is what ends up in `companies.logo_path`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use jobboard_common::Error;
use thiserror::Error;

pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;
pub const LOGO_DIR: &str = "company_logos";

#[derive(Error, Debug)]
pub enum LogoError {
    #[error("Unsupported logo content type '{0}'. Use PNG, JPEG, GIF or WebP")]
    UnsupportedContentType(String),

    #[error("Logo must be at most {max} bytes")]
    TooLarge { max: usize },

    #[error("Logo file is empty")]
    Empty,

    #[error("Logo content does not match its declared type '{0}'")]
    ContentMismatch(String),

    #[error("Logo storage failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LogoError> for Error {
    fn from(err: LogoError) -> Self {
        match err {
            LogoError::Io(e) => {
                tracing::error!(error = %e, "Logo storage I/O failure");
                Error::Internal("Failed to store logo".to_string())
            }
            other => Error::Validation(other.to_string()),
        }
    }
}

/// File extension for an accepted image content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Image format recognised from the file's leading magic bytes
pub fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

/// Check an upload and return the storage key it should be written under.
///
/// The declared content type must be an accepted image type and the bytes
/// must actually be in that format.
pub fn logo_key(slug: &str, content_type: &str, bytes: &[u8]) -> Result<String, LogoError> {
    let ext = extension_for(content_type)
        .ok_or_else(|| LogoError::UnsupportedContentType(content_type.to_string()))?;
    if bytes.is_empty() {
        return Err(LogoError::Empty);
    }
    if bytes.len() > MAX_LOGO_BYTES {
        return Err(LogoError::TooLarge {
            max: MAX_LOGO_BYTES,
        });
    }
    if sniff_extension(bytes) != Some(ext) {
        return Err(LogoError::ContentMismatch(content_type.to_string()));
    }
    Ok(format!("{}/{}.{}", LOGO_DIR, slug, ext))
}

/// Storage backend for uploaded logos
#[async_trait::async_trait]
pub trait LogoStorage: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<(), LogoError>;

    /// Remove the object under `key`; a missing object is not an error
    async fn remove(&self, key: &str) -> Result<(), LogoError>;
}

/// Logos on the local filesystem below a media root
#[derive(Debug, Clone)]
pub struct LocalLogoStorage {
    root: PathBuf,
}

impl LocalLogoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl LogoStorage for LocalLogoStorage {
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<(), LogoError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored logo");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LogoError> {
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogoStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryLogoStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LogoStorage for InMemoryLogoStorage {
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<(), LogoError> {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert(key.to_string(), bytes.to_vec());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LogoError> {
        if let Ok(mut objects) = self.objects.lock() {
            objects.remove(key);
        }
        Ok(())
    }
}
