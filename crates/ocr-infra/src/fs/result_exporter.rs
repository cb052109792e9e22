use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use ocr_core::file_validation::sanitize_filename;
use ocr_core::ocr::OcrResult;
use ocr_core::ports::{ExportError, ExportSummary, ResultExportPort};

pub const MARKDOWN_FILE: &str = "result.md";
pub const IMAGES_DIR: &str = "images";

/// Writes an OCR result as `result.md` plus decoded `images/`.
pub struct FsResultExporter;

#[async_trait]
impl ResultExportPort for FsResultExporter {
    async fn export(&self, result: &OcrResult, dir: &Path) -> Result<ExportSummary, ExportError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ExportError::Destination(format!("{}: {e}", dir.display())))?;

        let markdown_path = dir.join(MARKDOWN_FILE);
        fs::write(&markdown_path, result.markdown.as_bytes())
            .await
            .map_err(|e| ExportError::Write {
                path: markdown_path.clone(),
                reason: e.to_string(),
            })?;

        let mut images_written = 0;
        let mut images_skipped = Vec::new();

        if !result.images.is_empty() {
            let images_dir = dir.join(IMAGES_DIR);
            fs::create_dir_all(&images_dir)
                .await
                .map_err(|e| ExportError::Destination(format!("{}: {e}", images_dir.display())))?;

            for image in &result.images {
                let bytes = match image.decode() {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!(image = %image.file_name, error = %err, "skipping undecodable image");
                        images_skipped.push(image.file_name.clone());
                        continue;
                    }
                };

                let path = images_dir.join(sanitize_filename(&image.file_name));
                fs::write(&path, bytes).await.map_err(|e| ExportError::Write {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                images_written += 1;
            }
        }

        debug!(
            dir = %dir.display(),
            images_written,
            images_skipped = images_skipped.len(),
            "OCR result exported"
        );

        Ok(ExportSummary {
            markdown_path,
            images_written,
            images_skipped,
        })
    }
}
