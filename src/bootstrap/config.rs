//! # Configuration Loader / 配置加载器
//!
//! `load_config` is pure data loading: whatever the file holds becomes the
//! `AppConfig` facts. Defaults are applied later by `AppConfig::resolve`.

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use ocr_core::app_dirs::AppDirs;
use ocr_core::config::{AppConfig, ResolvedConfig};

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error)
/// - Content is not valid TOML (parse error)
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Pick the configuration source and apply defaults.
///
/// An explicit path must load. Without one, `<data dir>/config.toml` is used
/// when present, otherwise system defaults.
pub fn resolve_config(explicit: Option<PathBuf>, dirs: &AppDirs) -> anyhow::Result<ResolvedConfig> {
    let config = match explicit {
        Some(path) => load_config(path)?,
        None => {
            let default_file = dirs.default_config_file();
            if default_file.is_file() {
                load_config(default_file)?
            } else {
                debug!("no config file, using system defaults");
                AppConfig::with_system_defaults(dirs.app_data_root.clone())
            }
        }
    };

    Ok(config.resolve(&dirs.app_data_root))
}
