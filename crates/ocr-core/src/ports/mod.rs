//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `ocr-app` and the
//! adapters in `ocr-infra` / `ocr-platform`. Nothing in this crate implements
//! them except test doubles.

pub mod app_dirs;
pub mod clipboard;
mod clock;
pub mod credential;
pub mod errors;
pub mod export;
pub mod file_content;
pub mod fingerprint;
pub mod key_value;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod ocr_api;

pub use app_dirs::AppDirsPort;
pub use clipboard::{ClipboardError, ClipboardImage, ClipboardImagePort};
pub use clock::ClockPort;
pub use credential::{CredentialCipherPort, CredentialStatePort};
pub use errors::{AppDirsError, StorageError};
pub use export::{ExportError, ExportSummary, ResultExportPort};
pub use file_content::{ContentReadError, FileContentPort};
pub use fingerprint::DeviceFingerprintPort;
pub use key_value::KeyValueStorePort;
pub use ocr_api::{OcrApiError, OcrApiPort};
