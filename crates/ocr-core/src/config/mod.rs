//! # Configuration DTO / 配置数据
//!
//! [`AppConfig`] mirrors the TOML file and carries facts only: a missing value
//! is an empty string or zero, never an error. Defaults are applied in exactly
//! one place, [`AppConfig::resolve`].

mod resolved;

use std::path::PathBuf;

pub use resolved::{ResolvedConfig, DEFAULT_OCR_ENDPOINT, DEFAULT_OCR_MODEL};

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// OCR endpoint URL, may be empty
    pub ocr_endpoint: String,

    /// OCR model name, may be empty
    pub ocr_model: String,

    /// Per-file size limit in MiB; 0 when not configured
    pub max_size_mb: u64,

    /// Files per batch; 0 when not configured
    pub max_count: u64,

    /// Reject files whose header cannot be read instead of soft-passing them
    pub reject_on_read_error: bool,

    /// Credential store file (path info only, no existence check)
    pub credential_store_path: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// Must not validate or apply defaults. Negative integers map to 0.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let section_str = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let section_u64 = |section: &str, key: &str| -> u64 {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
                .unwrap_or(0)
        };

        Ok(Self {
            ocr_endpoint: section_str("ocr", "endpoint"),
            ocr_model: section_str("ocr", "model"),
            max_size_mb: section_u64("files", "max_size_mb"),
            max_count: section_u64("files", "max_count"),
            reject_on_read_error: toml_value
                .get("files")
                .and_then(|f| f.get("reject_on_read_error"))
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            credential_store_path: PathBuf::from(section_str("storage", "credential_store_path")),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            ocr_endpoint: String::new(),
            ocr_model: String::new(),
            max_size_mb: 0,
            max_count: 0,
            reject_on_read_error: false,
            credential_store_path: PathBuf::new(),
        }
    }

    /// Create AppConfig with system-default paths for production use
    ///
    /// `data_dir` is computed by the caller (platform app dirs adapter).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            credential_store_path: data_dir.join("credentials.json"),
            ..Self::empty()
        }
    }
}
