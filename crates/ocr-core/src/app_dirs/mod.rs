use std::path::PathBuf;

const LOG_DIR: &str = "logs";
const CONFIG_FILE: &str = "config.toml";

/// Resolved per-user application directories (facts only, no existence check).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn log_dir(&self) -> PathBuf {
        self.app_data_root.join(LOG_DIR)
    }

    pub fn default_config_file(&self) -> PathBuf {
        self.app_data_root.join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_root() {
        let dirs = AppDirs {
            app_data_root: PathBuf::from("/tmp/mistral-ocr-desk"),
        };
        assert_eq!(dirs.log_dir(), PathBuf::from("/tmp/mistral-ocr-desk/logs"));
        assert_eq!(
            dirs.default_config_file(),
            PathBuf::from("/tmp/mistral-ocr-desk/config.toml")
        );
    }
}
