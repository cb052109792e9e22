//! `mockall` doubles for ports whose call order matters to adapters.
//!
//! Enabled for this crate's tests and, through the `test-utils` feature, for
//! downstream crates' tests.

use mockall::mock;

use super::errors::StorageError;
use super::key_value::KeyValueStorePort;

mock! {
    pub KeyValueStore {}

    impl KeyValueStorePort for KeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
        fn delete(&self, key: &str) -> Result<(), StorageError>;
    }
}
