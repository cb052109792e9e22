use std::sync::Arc;

use tracing::{debug, warn};

use ocr_core::credential::{
    ApiKey, CredentialState, EncryptedCredential, ENCRYPTED_STORAGE_KEY, PLAINTEXT_STORAGE_KEY,
};
use ocr_core::ports::{CredentialStatePort, KeyValueStorePort, StorageError};

/// Maps [`CredentialState`] onto the two legacy storage keys.
///
/// Every save writes the new key before deleting the other one, so a failure
/// in between leaves both present rather than neither; `load` resolves that
/// mixed state in favour of the encrypted blob.
pub struct KvCredentialRepository {
    store: Arc<dyn KeyValueStorePort>,
}

impl KvCredentialRepository {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    fn read_non_empty(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(key)?.filter(|value| !value.trim().is_empty()))
    }
}

impl CredentialStatePort for KvCredentialRepository {
    fn load(&self) -> Result<CredentialState, StorageError> {
        let encrypted = self.read_non_empty(ENCRYPTED_STORAGE_KEY)?;
        let plaintext = self.read_non_empty(PLAINTEXT_STORAGE_KEY)?;

        let state = match (encrypted, plaintext) {
            (Some(blob), Some(_)) => {
                warn!("both plaintext and encrypted API keys stored; dropping plaintext copy");
                self.store.delete(PLAINTEXT_STORAGE_KEY)?;
                CredentialState::Encrypted(EncryptedCredential::from_blob(blob))
            }
            (Some(blob), None) => CredentialState::Encrypted(EncryptedCredential::from_blob(blob)),
            (None, Some(raw)) => ApiKey::parse(&raw)
                .map(CredentialState::Plaintext)
                .unwrap_or(CredentialState::Absent),
            (None, None) => CredentialState::Absent,
        };

        debug!(
            absent = state.is_absent(),
            encrypted = state.is_encrypted(),
            "credential state loaded"
        );
        Ok(state)
    }

    fn save(&self, state: &CredentialState) -> Result<(), StorageError> {
        match state {
            CredentialState::Absent => {
                self.store.delete(ENCRYPTED_STORAGE_KEY)?;
                self.store.delete(PLAINTEXT_STORAGE_KEY)?;
            }
            CredentialState::Plaintext(key) => {
                self.store.set(PLAINTEXT_STORAGE_KEY, key.expose())?;
                self.store.delete(ENCRYPTED_STORAGE_KEY)?;
            }
            CredentialState::Encrypted(blob) => {
                self.store.set(ENCRYPTED_STORAGE_KEY, blob.as_blob())?;
                self.store.delete(PLAINTEXT_STORAGE_KEY)?;
            }
        }
        debug!(
            absent = state.is_absent(),
            encrypted = state.is_encrypted(),
            "credential state saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    fn repo() -> (Arc<InMemoryKeyValueStore>, KvCredentialRepository) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let repo = KvCredentialRepository::new(store.clone());
        (store, repo)
    }

    #[test]
    fn empty_store_is_absent() {
        let (_, repo) = repo();
        assert!(repo.load().unwrap().is_absent());
    }

    #[test]
    fn saving_encrypted_removes_plaintext() {
        let (store, repo) = repo();
        repo.save(&CredentialState::Plaintext(ApiKey::parse("plain").unwrap()))
            .unwrap();
        repo.save(&CredentialState::Encrypted(EncryptedCredential::from_blob("QUJD")))
            .unwrap();

        assert_eq!(store.keys(), [ENCRYPTED_STORAGE_KEY]);
        match repo.load().unwrap() {
            CredentialState::Encrypted(blob) => assert_eq!(blob.as_blob(), "QUJD"),
            other => panic!("expected encrypted, got {other:?}"),
        }
    }

    #[test]
    fn saving_plaintext_removes_encrypted() {
        let (store, repo) = repo();
        repo.save(&CredentialState::Encrypted(EncryptedCredential::from_blob("QUJD")))
            .unwrap();
        repo.save(&CredentialState::Plaintext(ApiKey::parse("plain").unwrap()))
            .unwrap();

        assert_eq!(store.keys(), [PLAINTEXT_STORAGE_KEY]);
        match repo.load().unwrap() {
            CredentialState::Plaintext(key) => assert_eq!(key.expose(), "plain"),
            other => panic!("expected plaintext, got {other:?}"),
        }
    }

    #[test]
    fn absent_clears_both_keys() {
        let (store, repo) = repo();
        store.set(PLAINTEXT_STORAGE_KEY, "plain").unwrap();
        store.set(ENCRYPTED_STORAGE_KEY, "QUJD").unwrap();

        repo.save(&CredentialState::Absent).unwrap();

        assert!(store.keys().is_empty());
    }

    #[test]
    fn mixed_legacy_state_prefers_encrypted_and_drops_plaintext() {
        let (store, repo) = repo();
        store.set(PLAINTEXT_STORAGE_KEY, "plain").unwrap();
        store.set(ENCRYPTED_STORAGE_KEY, "QUJD").unwrap();

        let state = repo.load().unwrap();

        assert!(state.is_encrypted());
        assert_eq!(store.keys(), [ENCRYPTED_STORAGE_KEY]);
    }

    #[test]
    fn blank_values_read_as_absent() {
        let (store, repo) = repo();
        store.set(PLAINTEXT_STORAGE_KEY, "   ").unwrap();
        store.set(ENCRYPTED_STORAGE_KEY, "").unwrap();

        assert!(repo.load().unwrap().is_absent());
    }

    mod ordering {
        use super::*;
        use mockall::predicate::eq;
        use mockall::Sequence;
        use ocr_core::ports::mocks::MockKeyValueStore;

        #[test]
        fn encrypted_save_writes_before_deleting_plaintext() {
            let mut store = MockKeyValueStore::new();
            let mut seq = Sequence::new();
            store
                .expect_set()
                .with(eq(ENCRYPTED_STORAGE_KEY), eq("QUJD"))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
            store
                .expect_delete()
                .with(eq(PLAINTEXT_STORAGE_KEY))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));

            let repo = KvCredentialRepository::new(Arc::new(store));
            repo.save(&CredentialState::Encrypted(EncryptedCredential::from_blob("QUJD")))
                .unwrap();
        }

        #[test]
        fn plaintext_save_writes_before_deleting_encrypted() {
            let mut store = MockKeyValueStore::new();
            let mut seq = Sequence::new();
            store
                .expect_set()
                .with(eq(PLAINTEXT_STORAGE_KEY), eq("plain"))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
            store
                .expect_delete()
                .with(eq(ENCRYPTED_STORAGE_KEY))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));

            let repo = KvCredentialRepository::new(Arc::new(store));
            repo.save(&CredentialState::Plaintext(ApiKey::parse("plain").unwrap()))
                .unwrap();
        }

        #[test]
        fn failed_set_never_deletes_the_other_key() {
            let mut store = MockKeyValueStore::new();
            store
                .expect_set()
                .times(1)
                .returning(|_, _| Err(StorageError::Unavailable("disk full".into())));
            store.expect_delete().never();

            let repo = KvCredentialRepository::new(Arc::new(store));
            let err = repo
                .save(&CredentialState::Encrypted(EncryptedCredential::from_blob("QUJD")))
                .unwrap_err();

            assert!(matches!(err, StorageError::Unavailable(_)));
        }
    }

    #[test]
    fn failed_delete_after_set_keeps_new_key_and_surfaces_error() {
        struct FailingDelete(InMemoryKeyValueStore);

        impl KeyValueStorePort for FailingDelete {
            fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
                self.0.get(key)
            }
            fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
                self.0.set(key, value)
            }
            fn delete(&self, _key: &str) -> Result<(), StorageError> {
                Err(StorageError::Other("delete refused".into()))
            }
        }

        let inner = InMemoryKeyValueStore::new();
        inner.set(PLAINTEXT_STORAGE_KEY, "plain").unwrap();
        let store = Arc::new(FailingDelete(inner));
        let repo = KvCredentialRepository::new(store.clone());

        let err = repo
            .save(&CredentialState::Encrypted(EncryptedCredential::from_blob("QUJD")))
            .unwrap_err();

        assert!(matches!(err, StorageError::Other(_)));
        assert_eq!(
            store.0.get(ENCRYPTED_STORAGE_KEY).unwrap().as_deref(),
            Some("QUJD")
        );
        assert_eq!(
            store.0.get(PLAINTEXT_STORAGE_KEY).unwrap().as_deref(),
            Some("plain")
        );
    }
}
