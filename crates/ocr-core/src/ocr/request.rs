use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::file_validation::{mime_essence, SupportedFormat};
use crate::url_guard::{UrlKind, ValidatedUrl};

pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Document reference sent to the OCR API.
///
/// Serialises as `{"type": "image_url", "image_url": "..."}` or the
/// `document_url` equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrDocument {
    ImageUrl(String),
    DocumentUrl(String),
}

impl OcrDocument {
    pub fn from_url(url: &ValidatedUrl) -> Self {
        match url.kind() {
            UrlKind::Image => OcrDocument::ImageUrl(url.as_str().to_string()),
            UrlKind::Document => OcrDocument::DocumentUrl(url.as_str().to_string()),
        }
    }

    /// Embed file bytes as a data URI. PDFs go as documents, everything else
    /// as images. Images keep the declared essence, so `image/jpg` stays as is.
    pub fn from_file(format: SupportedFormat, declared_mime: &str, bytes: &[u8]) -> Self {
        if format.is_image() {
            OcrDocument::ImageUrl(data_uri(&mime_essence(declared_mime), bytes))
        } else {
            OcrDocument::DocumentUrl(data_uri(format.mime(), bytes))
        }
    }

    fn type_tag(&self) -> &'static str {
        match self {
            OcrDocument::ImageUrl(_) => "image_url",
            OcrDocument::DocumentUrl(_) => "document_url",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            OcrDocument::ImageUrl(url) | OcrDocument::DocumentUrl(url) => url,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.url().starts_with("data:")
    }
}

impl Serialize for OcrDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.type_tag();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", tag)?;
        map.serialize_entry(tag, self.url())?;
        map.end()
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrRequest {
    pub model: String,
    pub document: OcrDocument,
    pub include_image_base64: bool,
}

impl OcrRequest {
    pub fn new(document: OcrDocument) -> Self {
        Self::with_model(DEFAULT_MODEL, document)
    }

    pub fn with_model(model: impl Into<String>, document: OcrDocument) -> Self {
        Self {
            model: model.into(),
            document,
            include_image_base64: true,
        }
    }
}
