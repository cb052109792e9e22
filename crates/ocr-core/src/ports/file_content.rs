use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::file_validation::FileSource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentReadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("read failed: {0}")]
    Io(String),
}

/// Access to the bytes behind a [`FileSource`].
#[async_trait]
pub trait FileContentPort: Send + Sync {
    /// Read at most `len` leading bytes. Shorter files yield fewer bytes.
    async fn read_prefix(&self, source: &FileSource, len: usize) -> Result<Vec<u8>, ContentReadError>;

    async fn read_all(&self, source: &FileSource) -> Result<Bytes, ContentReadError>;
}
