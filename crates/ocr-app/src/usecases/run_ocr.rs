use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use ocr_core::credential::ApiKey;
use ocr_core::file_validation::{CandidateFile, FileRejection, FileVerdict, SupportedFormat};
use ocr_core::ocr::{parse_response, OcrDocument, OcrRequest, OcrResult};
use ocr_core::ports::{ContentReadError, FileContentPort, OcrApiError, OcrApiPort};
use ocr_core::url_guard::ValidatedUrl;

use super::ValidateFiles;

/// What to run OCR on.
#[derive(Debug, Clone)]
pub enum OcrSource {
    /// A local file. It is validated again before being embedded as a data URI.
    File(CandidateFile),
    /// A remote URL that passed the guard.
    Url(ValidatedUrl),
}

#[derive(Debug, thiserror::Error)]
pub enum RunOcrError {
    #[error("no API key is configured")]
    MissingApiKey,

    #[error("file rejected: {0}")]
    Rejected(#[source] FileRejection),

    #[error("failed to read file: {0}")]
    ReadFailed(#[source] ContentReadError),

    #[error(transparent)]
    Api(#[from] OcrApiError),
}

/// Send one document to the OCR service and normalise the answer.
///
/// Files go through the same validator as the upload queue, so nothing the
/// validator would refuse reaches the API.
pub struct RunOcr {
    content: Arc<dyn FileContentPort>,
    validator: Arc<ValidateFiles>,
    api: Arc<dyn OcrApiPort>,
    model: String,
}

impl RunOcr {
    pub fn new(
        content: Arc<dyn FileContentPort>,
        validator: Arc<ValidateFiles>,
        api: Arc<dyn OcrApiPort>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            content,
            validator,
            api,
            model: model.into(),
        }
    }

    pub async fn execute(
        &self,
        source: &OcrSource,
        api_key: Option<&ApiKey>,
    ) -> Result<OcrResult, RunOcrError> {
        let span = info_span!("usecase.run_ocr.execute", model = %self.model);

        async {
            let api_key = api_key.ok_or(RunOcrError::MissingApiKey)?;

            let document = match source {
                OcrSource::Url(url) => OcrDocument::from_url(url),
                OcrSource::File(file) => self.embed(file).await?,
            };
            let inline = document.is_inline();

            let request = OcrRequest::with_model(self.model.clone(), document);
            let body = self.api.process(api_key, &request).await?;
            let result = parse_response(&body);

            if result.is_empty() {
                warn!(inline, "OCR response contained no text");
            }
            info!(
                inline,
                pages = result.page_count,
                images = result.images.len(),
                "OCR finished"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }

    async fn embed(&self, file: &CandidateFile) -> Result<OcrDocument, RunOcrError> {
        if let FileVerdict::Rejected(rejection) = self.validator.validate_one(file).await {
            debug!(file = %file.name, %rejection, "file refused before upload");
            return Err(RunOcrError::Rejected(rejection));
        }
        let format = SupportedFormat::from_mime(&file.declared_mime).ok_or_else(|| {
            RunOcrError::Rejected(FileRejection::UnsupportedType {
                mime: file.declared_mime.clone(),
            })
        })?;
        let bytes = self
            .content
            .read_all(&file.source)
            .await
            .map_err(RunOcrError::ReadFailed)?;
        Ok(OcrDocument::from_file(format, &file.declared_mime, &bytes))
    }
}
