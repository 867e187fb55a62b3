//! Storage for uploaded file contents.

use std::path::{Path, PathBuf};
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use notepad_core::error::{AppError, ErrorKind};
use notepad_core::result::AppResult;

/// A stream of upload chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Where a blob ended up and how large it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Path recorded on the file row.
    pub path: String,
    /// Number of bytes written.
    pub size: u64,
}

/// Backend that keeps uploaded bytes.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write `stream` under `key`, failing once more than `limit` bytes
    /// arrive. A failed write leaves nothing behind.
    async fn put(&self, key: &str, stream: ByteStream, limit: u64) -> AppResult<StoredBlob>;

    /// Remove a blob by the path returned from `put`. Missing blobs are not
    /// an error.
    async fn remove(&self, path: &str) -> AppResult<()>;
}

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create the store, making the root directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    async fn write_all(&self, path: &Path, mut stream: ByteStream, limit: u64) -> AppResult<u64> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to create upload file", e)
        })?;

        let mut total = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Upload stream failed", e))?;
            total += chunk.len() as u64;
            if total > limit {
                return Err(AppError::validation(format!(
                    "File exceeds maximum upload size of {limit} bytes"
                )));
            }
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write upload chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush upload", e))?;
        Ok(total)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, stream: ByteStream, limit: u64) -> AppResult<StoredBlob> {
        let full_path = self.root.join(key);
        match self.write_all(&full_path, stream, limit).await {
            Ok(size) => {
                debug!(path = %full_path.display(), bytes = size, "Stored upload");
                Ok(StoredBlob {
                    path: full_path.to_string_lossy().into_owned(),
                    size,
                })
            }
            Err(e) => {
                let _ = fs::remove_file(&full_path).await;
                Err(e)
            }
        }
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {path}"),
                e,
            )),
        }
    }
}
