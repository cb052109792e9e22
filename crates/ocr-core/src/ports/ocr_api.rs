use async_trait::async_trait;
use thiserror::Error;

use crate::credential::ApiKey;
use crate::ocr::OcrRequest;

#[derive(Debug, Error)]
pub enum OcrApiError {
    #[error("the OCR API rejected the API key")]
    Unauthorized,

    #[error("OCR API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not reach the OCR API: {0}")]
    Transport(String),

    #[error("OCR API returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Remote OCR service. Returns the raw JSON body of a successful response.
#[async_trait]
pub trait OcrApiPort: Send + Sync {
    async fn process(
        &self,
        api_key: &ApiKey,
        request: &OcrRequest,
    ) -> Result<serde_json::Value, OcrApiError>;
}
