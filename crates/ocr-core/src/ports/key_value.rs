use super::errors::StorageError;

/// Persistent string key-value store, the host equivalent of browser local
/// storage. Last write wins.
///
/// 持久化键值存储端口。
pub trait KeyValueStorePort: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a value by key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value by key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}
