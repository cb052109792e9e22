use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, info_span, Instrument};

use ocr_core::file_validation::{CandidateFile, FileRejection, FileVerdict, ValidationWarning};
use ocr_core::ports::{ClipboardError, ClipboardImagePort, ClockPort};

use super::validate_files::ValidateFiles;

#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    #[error("clipboard holds no image")]
    NoImage,

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error("pasted image rejected: {0}")]
    Rejected(FileRejection),
}

#[derive(Debug)]
pub struct PastedImage {
    pub file: CandidateFile,
    pub warnings: Vec<ValidationWarning>,
}

/// Take the image on the clipboard as a PNG candidate file.
///
/// The file is named after the paste time and goes through the same
/// validation as picked files.
pub struct PasteClipboardImage {
    clipboard: Arc<dyn ClipboardImagePort>,
    clock: Arc<dyn ClockPort>,
    validate: Arc<ValidateFiles>,
}

impl PasteClipboardImage {
    pub fn new(
        clipboard: Arc<dyn ClipboardImagePort>,
        clock: Arc<dyn ClockPort>,
        validate: Arc<ValidateFiles>,
    ) -> Self {
        Self {
            clipboard,
            clock,
            validate,
        }
    }

    pub async fn execute(&self) -> Result<PastedImage, PasteError> {
        let span = info_span!("usecase.paste_clipboard_image.execute");

        async {
            let image = self.clipboard.read_image()?.ok_or(PasteError::NoImage)?;

            let name = pasted_file_name(self.clock.now_ms());
            let file = CandidateFile::from_bytes(name, "image/png", image.png);

            match self.validate.validate_one(&file).await {
                FileVerdict::Accepted { warnings } => {
                    info!(
                        file = %file.name,
                        width = image.width,
                        height = image.height,
                        "clipboard image pasted"
                    );
                    Ok(PastedImage { file, warnings })
                }
                FileVerdict::Rejected(rejection) => Err(PasteError::Rejected(rejection)),
            }
        }
        .instrument(span)
        .await
    }
}

/// `clipboard-2024-05-01T10-20-30-123Z.png`
fn pasted_file_name(now_ms: i64) -> String {
    let at = DateTime::<Utc>::from_timestamp_millis(now_ms).unwrap_or_default();
    let stamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("clipboard-{stamp}.png")
}
