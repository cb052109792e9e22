//! Mistral OCR Desk application layer
//!
//! Use cases orchestrate the ports declared in `ocr-core`. They hold
//! `Arc<dyn Port>` dependencies and expose a single `execute` entry point.

pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use usecases::{
    AcceptUrl, ClearApiKey, ExportResult, OcrSource, PasteClipboardImage, RestoreApiKey,
    RestoreOutcome, RunOcr, StoreApiKey, StoreOutcome, ValidateFiles,
};
