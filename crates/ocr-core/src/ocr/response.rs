use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

use super::markdown::rewrite_image_links;

const DEFAULT_IMAGE_PREFIX: &str = "data:image/png;base64,";
const TEXT_FALLBACK_FIELDS: [&str; 4] = ["markdown", "text", "content", "result"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImagePayloadError {
    #[error("image is not a base64 data URI")]
    NotBase64DataUri,

    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// An image returned inline by the OCR API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub id: String,
    /// Name the Markdown refers to, relative to `images/`.
    pub file_name: String,
    /// Always a `data:` URI.
    pub data_uri: String,
}

impl ExtractedImage {
    /// MIME type declared in the data URI header.
    pub fn mime(&self) -> Option<&str> {
        let header = self.data_uri.strip_prefix("data:")?.split(',').next()?;
        header.split(';').next().filter(|m| !m.is_empty())
    }

    pub fn decode(&self) -> Result<Vec<u8>, ImagePayloadError> {
        let rest = self
            .data_uri
            .strip_prefix("data:")
            .ok_or(ImagePayloadError::NotBase64DataUri)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(ImagePayloadError::NotBase64DataUri)?;
        if !header.ends_with(";base64") {
            return Err(ImagePayloadError::NotBase64DataUri);
        }
        STANDARD
            .decode(payload.trim())
            .map_err(|e| ImagePayloadError::InvalidBase64(e.to_string()))
    }
}

/// Text and images extracted from one OCR response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrResult {
    pub markdown: String,
    pub images: Vec<ExtractedImage>,
    pub page_count: usize,
}

impl OcrResult {
    pub fn is_empty(&self) -> bool {
        self.markdown.trim().is_empty()
    }
}

/// Read an OCR response body. Unknown shapes yield an empty result.
pub fn parse_response(body: &Value) -> OcrResult {
    match body.get("pages").and_then(Value::as_array) {
        Some(pages) if !pages.is_empty() => parse_pages(pages),
        _ => parse_flat(body),
    }
}

fn parse_pages(pages: &[Value]) -> OcrResult {
    let mut texts = Vec::new();
    let mut images = Vec::new();

    for page in pages {
        let text = string_field(page, "markdown").or_else(|| string_field(page, "text"));
        if let Some(text) = text {
            texts.push(text);
        }

        let page_images = page.get("images").and_then(Value::as_array);
        for (index, image) in page_images.into_iter().flatten().enumerate() {
            if let Some(extracted) = extract_image(image, index) {
                images.push(extracted);
            }
        }
    }

    let joined = texts.join("\n\n");
    OcrResult {
        markdown: rewrite_image_links(joined.trim()).into_owned(),
        images,
        page_count: pages.len(),
    }
}

fn parse_flat(body: &Value) -> OcrResult {
    let text = TEXT_FALLBACK_FIELDS
        .iter()
        .find_map(|field| string_field(body, field))
        .unwrap_or_default();

    OcrResult {
        markdown: rewrite_image_links(text.trim()).into_owned(),
        images: Vec::new(),
        page_count: 0,
    }
}

fn extract_image(image: &Value, index: usize) -> Option<ExtractedImage> {
    let payload = string_field(image, "image_base64")?;

    let id = string_field(image, "id");
    let file_name = match id {
        Some(id) if id.contains('.') => id.to_string(),
        Some(id) => format!("{id}.jpeg"),
        None => format!("img-{index}.jpeg"),
    };

    let data_uri = if payload.starts_with("data:") {
        payload.to_string()
    } else {
        format!("{DEFAULT_IMAGE_PREFIX}{payload}")
    };

    Some(ExtractedImage {
        id: id.map_or_else(|| format!("img-{index}"), str::to_string),
        file_name,
        data_uri,
    })
}

/// Non-empty string field.
fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}
