use std::path::{Path, PathBuf};

use crate::file_validation::{ContentReadPolicy, FileLimits, DEFAULT_MAX_COUNT, DEFAULT_MAX_SIZE_BYTES};

use super::AppConfig;

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.mistral.ai/v1/ocr";
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";

const CREDENTIAL_STORE_FILE: &str = "credentials.json";

/// Configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub ocr_endpoint: String,
    pub ocr_model: String,
    pub file_limits: FileLimits,
    pub credential_store_path: PathBuf,
}

impl AppConfig {
    /// Fill every unset fact with its default. Relative store paths are
    /// resolved against `data_dir`.
    pub fn resolve(&self, data_dir: &Path) -> ResolvedConfig {
        let or_default = |value: &str, default: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        };

        let max_size_bytes = match self.max_size_mb {
            0 => DEFAULT_MAX_SIZE_BYTES,
            mb => mb.saturating_mul(1024 * 1024),
        };
        let max_count = match self.max_count {
            0 => DEFAULT_MAX_COUNT,
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };
        let content_read_policy = if self.reject_on_read_error {
            ContentReadPolicy::Reject
        } else {
            ContentReadPolicy::SoftPass
        };

        let credential_store_path = if self.credential_store_path.as_os_str().is_empty() {
            data_dir.join(CREDENTIAL_STORE_FILE)
        } else if self.credential_store_path.is_relative() {
            data_dir.join(&self.credential_store_path)
        } else {
            self.credential_store_path.clone()
        };

        ResolvedConfig {
            ocr_endpoint: or_default(&self.ocr_endpoint, DEFAULT_OCR_ENDPOINT),
            ocr_model: or_default(&self.ocr_model, DEFAULT_OCR_MODEL),
            file_limits: FileLimits {
                max_size_bytes,
                max_count,
                content_read_policy,
            },
            credential_store_path,
        }
    }
}
