//! Scratch storage for uploads and their normalized derivatives.
//!
//! Every file is created with a unique name under a single directory and is
//! owned by a [`TempArtifact`]. Dropping an artifact that was never removed
//! deletes the file synchronously, so a panic or a cancelled future cannot
//! leak it.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Largest slice handed to a single write call.
pub const WRITE_CHUNK_BYTES: usize = 1024 * 1024;

const FILE_PREFIX: &str = "ddobaki-";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to prepare scratch directory {dir}: {source}")]
    Directory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create temporary file in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Temporary file {0} is no longer writable")]
    Closed(PathBuf),
}

/// Why streaming an upload to disk stopped.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("Failed to read upload: {0}")]
    Source(String),
}

/// A uniquely named scratch file that is deleted when the request is done.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    file: Option<File>,
    removed: bool,
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the write handle so another process can replace the file.
    pub fn close(&mut self) {
        self.file = None;
    }

    /// Delete the file.
    ///
    /// Idempotent. A file that is already gone is not an error, and other
    /// filesystem failures are logged rather than returned so cleanup never
    /// hides the result it runs after.
    pub async fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.file = None;
        self.removed = true;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary file"
            ),
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        self.file = None;
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary file on drop"
            );
        }
    }
}

/// Allocates scratch files under one directory.
#[derive(Debug, Clone)]
pub struct TempStore {
    dir: PathBuf,
    chunk_size: usize,
}

impl TempStore {
    /// Use `dir` for scratch files, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Directory {
            dir: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            chunk_size: WRITE_CHUNK_BYTES,
        })
    }

    /// Override the write increment. Values below 1 are clamped to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allocate a new, empty file named `ddobaki-XXXXXX.<suffix>`.
    pub fn create(&self, suffix: &str) -> Result<TempArtifact, StorageError> {
        let (file, path) = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(&format!(".{suffix}"))
            .tempfile_in(&self.dir)
            .and_then(|named| named.keep().map_err(|e| e.error))
            .map_err(|source| StorageError::Create {
                dir: self.dir.clone(),
                source,
            })?;

        debug!(path = %path.display(), "Created temporary file");

        Ok(TempArtifact {
            path,
            file: Some(File::from_std(file)),
            removed: false,
        })
    }

    /// Persist a byte stream into `artifact`, at most `limit` bytes in total.
    ///
    /// Incoming chunks are written in slices of at most the store's chunk size,
    /// so memory use does not grow with the upload. The write handle is closed
    /// on success. Returns the number of bytes written.
    pub async fn write_stream<S, E>(
        &self,
        artifact: &mut TempArtifact,
        stream: S,
        limit: usize,
    ) -> Result<u64, WriteError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let mut file = artifact
            .file
            .take()
            .ok_or_else(|| StorageError::Closed(artifact.path.clone()))?;
        let write_err = |source| StorageError::Write {
            path: artifact.path.clone(),
            source,
        };

        let mut stream = std::pin::pin!(stream);
        let mut written: usize = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| WriteError::Source(e.to_string()))?;
            if written.saturating_add(chunk.len()) > limit {
                return Err(WriteError::TooLarge { limit });
            }
            for slice in chunk.chunks(self.chunk_size) {
                file.write_all(slice).await.map_err(write_err)?;
            }
            written += chunk.len();
        }

        file.flush().await.map_err(write_err)?;
        Ok(written as u64)
    }
}
