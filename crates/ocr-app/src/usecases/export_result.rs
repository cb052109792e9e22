use std::path::Path;
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use ocr_core::ocr::OcrResult;
use ocr_core::ports::{ExportError, ExportSummary, ResultExportPort};

#[derive(Debug, thiserror::Error)]
pub enum ExportResultError {
    #[error("there is no OCR result to export")]
    NothingToExport,

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Save an OCR result as `result.md` plus its images.
pub struct ExportResult {
    exporter: Arc<dyn ResultExportPort>,
}

impl ExportResult {
    pub fn new(exporter: Arc<dyn ResultExportPort>) -> Self {
        Self { exporter }
    }

    pub async fn execute(
        &self,
        result: &OcrResult,
        dir: &Path,
    ) -> Result<ExportSummary, ExportResultError> {
        let span = info_span!("usecase.export_result.execute", dir = %dir.display());

        async {
            if result.is_empty() && result.images.is_empty() {
                return Err(ExportResultError::NothingToExport);
            }

            let summary = self.exporter.export(result, dir).await?;
            if !summary.images_skipped.is_empty() {
                warn!(skipped = ?summary.images_skipped, "some images could not be decoded");
            }
            info!(
                markdown = %summary.markdown_path.display(),
                images = summary.images_written,
                "OCR result exported"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingExporter {
        dirs: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl ResultExportPort for RecordingExporter {
        async fn export(&self, result: &OcrResult, dir: &Path) -> Result<ExportSummary, ExportError> {
            self.dirs.lock().unwrap().push(dir.to_path_buf());
            Ok(ExportSummary {
                markdown_path: dir.join("result.md"),
                images_written: result.images.len(),
                images_skipped: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn empty_result_is_not_exported() {
        let exporter = Arc::new(RecordingExporter::default());
        let err = ExportResult::new(exporter.clone())
            .execute(&OcrResult::default(), Path::new("/tmp/out"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExportResultError::NothingToExport));
        assert!(exporter.dirs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delegates_to_exporter() {
        let exporter = Arc::new(RecordingExporter::default());
        let result = OcrResult {
            markdown: "# Title".to_string(),
            ..OcrResult::default()
        };

        let summary = ExportResult::new(exporter.clone())
            .execute(&result, Path::new("/tmp/out"))
            .await
            .unwrap();

        assert_eq!(summary.markdown_path, PathBuf::from("/tmp/out/result.md"));
        assert_eq!(*exporter.dirs.lock().unwrap(), vec![PathBuf::from("/tmp/out")]);
    }
}
