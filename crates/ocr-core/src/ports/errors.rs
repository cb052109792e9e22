use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,
}

/// Key-value storage errors.
///
/// 键值存储错误类型。
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing store cannot be reached or created.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data is corrupt or invalid.
    #[error("storage data corrupt: {0}")]
    Corrupt(String),

    /// Other storage failures.
    #[error("storage failed: {0}")]
    Other(String),
}
