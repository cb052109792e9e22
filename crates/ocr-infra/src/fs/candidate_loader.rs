use std::path::Path;

use anyhow::{Context, Result};

use ocr_core::file_validation::CandidateFile;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Describe a file on disk the way a file picker would: base name, MIME type
/// guessed from the extension, size from metadata. Content is not read.
pub async fn candidate_from_path(path: &Path) -> Result<CandidateFile> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to stat {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let declared_mime = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(UNKNOWN_MIME)
        .to_string();

    Ok(CandidateFile::from_path(
        name,
        declared_mime,
        metadata.len(),
        path.to_path_buf(),
    ))
}
