use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::ocr::OcrResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export directory unusable: {0}")]
    Destination(String),

    #[error("failed to write {}: {}", .path.display(), .reason)]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub markdown_path: PathBuf,
    pub images_written: usize,
    /// Images whose payload could not be decoded, by file name.
    pub images_skipped: Vec<String>,
}

/// Writes `result.md` and `images/` into a directory.
#[async_trait]
pub trait ResultExportPort: Send + Sync {
    async fn export(&self, result: &OcrResult, dir: &Path) -> Result<ExportSummary, ExportError>;
}
