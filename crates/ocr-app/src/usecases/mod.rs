//! Use cases, one per user action.
//!
//! [key set]     → StoreApiKey
//! [startup]     → RestoreApiKey ── NeedsReentry → prompt
//! [key clear]   → ClearApiKey
//! [files]       → ValidateFiles → RunOcr → ExportResult
//! [paste]       → PasteClipboardImage ┘
//! [url]         → AcceptUrl ──────────┘

pub mod accept_url;
pub mod credential;
pub mod export_result;
pub mod paste_clipboard_image;
pub mod run_ocr;
pub mod validate_files;

pub use accept_url::AcceptUrl;
pub use credential::{
    ClearApiKey, ClearApiKeyError, RestoreApiKey, RestoreApiKeyError, RestoreOutcome, StoreApiKey,
    StoreApiKeyError, StoreOutcome,
};
pub use export_result::{ExportResult, ExportResultError};
pub use paste_clipboard_image::{PasteClipboardImage, PasteError, PastedImage};
pub use run_ocr::{OcrSource, RunOcr, RunOcrError};
pub use validate_files::ValidateFiles;
