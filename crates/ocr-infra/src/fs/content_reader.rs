use std::io;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;

use ocr_core::file_validation::FileSource;
use ocr_core::ports::{ContentReadError, FileContentPort};

/// Reads candidate bytes from memory or the local filesystem.
pub struct FsFileContentReader;

fn map_io_error(path: &Path, err: io::Error) -> ContentReadError {
    if err.kind() == io::ErrorKind::NotFound {
        ContentReadError::NotFound(path.to_path_buf())
    } else {
        ContentReadError::Io(format!("{}: {err}", path.display()))
    }
}

#[async_trait]
impl FileContentPort for FsFileContentReader {
    async fn read_prefix(&self, source: &FileSource, len: usize) -> Result<Vec<u8>, ContentReadError> {
        match source {
            FileSource::Memory(bytes) => Ok(bytes[..bytes.len().min(len)].to_vec()),
            FileSource::Path(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| map_io_error(path, e))?;
                let mut prefix = Vec::with_capacity(len);
                file.take(len as u64)
                    .read_to_end(&mut prefix)
                    .await
                    .map_err(|e| map_io_error(path, e))?;
                Ok(prefix)
            }
        }
    }

    async fn read_all(&self, source: &FileSource) -> Result<Bytes, ContentReadError> {
        match source {
            FileSource::Memory(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| map_io_error(path, e)),
        }
    }
}
