use tracing::{debug, info_span};

use ocr_core::url_guard::{validate_url, UrlRejection, ValidatedUrl};

/// Turn user-entered URL text into a URL the OCR use case will accept.
///
/// Nothing is fetched here; the guard only inspects the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptUrl;

impl AcceptUrl {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, raw: &str) -> Result<ValidatedUrl, UrlRejection> {
        let _span = info_span!("usecase.accept_url.execute").entered();

        validate_url(raw.trim()).into_result().inspect_err(|reason| {
            debug!(%reason, "URL refused");
        })
    }
}
