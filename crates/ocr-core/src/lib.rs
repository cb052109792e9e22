//! # ocr-core
//!
//! Core domain models and validation rules for Mistral OCR Desk.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Everything that touches the network, the filesystem or the host environment is
//! expressed as a port in [`ports`] and implemented elsewhere.

pub mod app_dirs;
pub mod config;
pub mod credential;
pub mod crypto;
pub mod file_validation;
pub mod ocr;
pub mod ports;
pub mod url_guard;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use credential::{ApiKey, CredentialState, EncryptedCredential, SecretString};
pub use crypto::{DeviceFingerprint, EnvironmentSignals};
pub use file_validation::{
    BatchReport, CandidateFile, FileRejection, FileSource, FileValidationPolicy, FileVerdict,
};
pub use ocr::{OcrDocument, OcrRequest, OcrResult};
pub use url_guard::{validate_url, UrlKind, UrlRejection, UrlVerdict, ValidatedUrl};
