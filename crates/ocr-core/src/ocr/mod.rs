//! Mistral OCR request and response model.
//!
//! Building the request and reading the response are pure data mapping. The
//! HTTP exchange lives behind [`OcrApiPort`](crate::ports::OcrApiPort).

mod markdown;
mod request;
mod response;

pub use markdown::rewrite_image_links;
pub use request::{data_uri, OcrDocument, OcrRequest, DEFAULT_MODEL};
pub use response::{parse_response, ExtractedImage, ImagePayloadError, OcrResult};
