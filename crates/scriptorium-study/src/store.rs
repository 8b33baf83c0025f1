//! Commentary persistence
//!
//! A store holds one [`CommentaryBook`] per study. [`JsonFileStore`] writes
//! the book as a JSON list through a temporary file and a rename, so a crash
//! mid-write leaves the previous document intact. Saves through one store
//! (or its clones) are serialized and each uses its own temporary file.

use crate::commentary::CommentaryBook;
use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ulid::Ulid;

/// Persists a commentary book
#[async_trait]
pub trait CommentaryStore: Send + Sync {
    /// Load the stored book, empty if nothing was saved yet
    async fn load(&self) -> Result<CommentaryBook, StoreError>;

    /// Replace the stored book
    async fn save(&self, book: &CommentaryBook) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    book: Mutex<CommentaryBook>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored book
    #[must_use]
    pub fn snapshot(&self) -> CommentaryBook {
        self.book.lock().clone()
    }
}

#[async_trait]
impl CommentaryStore for MemoryStore {
    async fn load(&self) -> Result<CommentaryBook, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, book: &CommentaryBook) -> Result<(), StoreError> {
        *self.book.lock() = book.clone();
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl JsonFileStore {
    /// Create store at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Document path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "commentary".into(), |n| n.to_string_lossy().into_owned());
        self.path.with_file_name(format!(".{name}.{}.tmp", Ulid::new()))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CommentaryStore for JsonFileStore {
    async fn load(&self) -> Result<CommentaryBook, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no commentary file at {}, starting empty", self.path.display());
                return Ok(CommentaryBook::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let book: CommentaryBook = serde_json::from_str(&text)?;
        tracing::debug!("loaded {} commentaries from {}", book.len(), self.path.display());
        Ok(book)
    }

    async fn save(&self, book: &CommentaryBook) -> Result<(), StoreError> {
        let _write = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(book)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(e));
        }

        tracing::debug!("saved {} commentaries to {}", book.len(), self.path.display());
        Ok(())
    }
}
