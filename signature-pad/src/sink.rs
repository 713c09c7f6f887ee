//! Persistence of exported signatures.
//!
//! A [`PersistenceSink`] takes an encoded [`ExportedImage`] and stores it,
//! describing the stored asset as a [`SavedSignature`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use signature_renderer::{ExportFormat, ExportedImage};

/// File name prefix for saved signatures.
pub const FILE_PREFIX: &str = "signature_";

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors that can occur while persisting a signature.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// An I/O error occurred while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The sink could not pick a free file name.
    #[error("No free file name for {0}")]
    NameExhausted(String),
}

/// A stored signature image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSignature {
    /// Location of the stored file.
    pub path: PathBuf,
    /// `file://` URI of the stored file.
    pub uri: String,
    /// File name, including extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoding of the stored bytes.
    pub format: ExportFormat,
}

/// Destination for exported signatures.
pub trait PersistenceSink: Send + Sync {
    /// Store an encoded image.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the image cannot be stored.
    fn persist(&self, image: &ExportedImage) -> SinkResult<SavedSignature>;
}

/// Writes each signature to its own file in a directory.
///
/// Files are named `signature_<unix-millis>.<ext>`; if that name is taken a
/// `-<n>` suffix is appended, so existing files are never overwritten.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

/// Suffixes tried before giving up on a timestamp.
const MAX_NAME_ATTEMPTS: u32 = 1000;

impl DirectorySink {
    /// Create a sink writing into `dir`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> SinkResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let dir = std::fs::canonicalize(&dir)?;
        tracing::debug!("Saving signatures to {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn create_file(&self, ext: &str) -> SinkResult<(std::fs::File, PathBuf, String)> {
        let stamp = unix_millis();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{FILE_PREFIX}{stamp}.{ext}")
            } else {
                format!("{FILE_PREFIX}{stamp}-{attempt}.{ext}")
            };
            let path = self.dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file, path, name)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            }
        }
        Err(SinkError::NameExhausted(format!("{FILE_PREFIX}{stamp}.{ext}")))
    }
}

impl PersistenceSink for DirectorySink {
    fn persist(&self, image: &ExportedImage) -> SinkResult<SavedSignature> {
        let (mut file, path, name) = self.create_file(image.format.extension())?;
        if let Err(e) = file.write_all(&image.bytes).and_then(|()| file.sync_all()) {
            tracing::warn!("Failed to write {}: {e}", path.display());
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }
        let size = file.metadata()?.len();

        tracing::info!("Saved signature to {} ({size} bytes)", path.display());
        Ok(SavedSignature {
            uri: format!("file://{}", path.display()),
            path,
            name,
            size,
            width: image.width,
            height: image.height,
            format: image.format,
        })
    }
}

/// Keeps saved signatures in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<ExportedImage>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Images stored so far, oldest first.
    #[must_use]
    pub fn images(&self) -> Vec<ExportedImage> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceSink for MemorySink {
    fn persist(&self, image: &ExportedImage) -> SinkResult<SavedSignature> {
        let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        let name = format!(
            "{FILE_PREFIX}{}.{}",
            saved.len(),
            image.format.extension()
        );
        saved.push(image.clone());
        Ok(SavedSignature {
            path: PathBuf::from(&name),
            uri: format!("memory://{name}"),
            name,
            size: image.size() as u64,
            width: image.width,
            height: image.height,
            format: image.format,
        })
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}
