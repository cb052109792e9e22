use std::sync::Arc;

use ocr_app::usecases::{ClearApiKey, RestoreApiKey, RestoreOutcome, StoreApiKey, StoreOutcome};
use ocr_core::credential::{ENCRYPTED_STORAGE_KEY, PLAINTEXT_STORAGE_KEY};
use ocr_core::crypto::{DeviceFingerprint, EnvironmentSignals, FingerprintError};
use ocr_core::ports::{DeviceFingerprintPort, KeyValueStorePort};
use ocr_infra::security::AesGcmCredentialCipher;
use ocr_infra::storage::{InMemoryKeyValueStore, JsonFileKeyValueStore, KvCredentialRepository};
use tempfile::TempDir;

struct FixedFingerprint {
    time_zone: &'static str,
}

impl DeviceFingerprintPort for FixedFingerprint {
    fn current(&self) -> Result<DeviceFingerprint, FingerprintError> {
        Ok(DeviceFingerprint::from_signals(&EnvironmentSignals {
            agent: "mistral-ocr-desk (linux; x86_64)".to_string(),
            language: "en_US.UTF-8".to_string(),
            display: "workstation".to_string(),
            time_zone: self.time_zone.to_string(),
            utc_offset_minutes: 60,
        }))
    }
}

struct Harness {
    store: Arc<dyn KeyValueStorePort>,
}

impl Harness {
    fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    fn repo(&self) -> Arc<KvCredentialRepository> {
        Arc::new(KvCredentialRepository::new(self.store.clone()))
    }

    fn store_key(&self, time_zone: &'static str) -> StoreApiKey {
        StoreApiKey::new(
            self.repo(),
            Arc::new(AesGcmCredentialCipher::with_iterations(1)),
            Arc::new(FixedFingerprint { time_zone }),
        )
    }

    fn restore_key(&self, time_zone: &'static str) -> RestoreApiKey {
        RestoreApiKey::new(
            self.repo(),
            Arc::new(AesGcmCredentialCipher::with_iterations(1)),
            Arc::new(FixedFingerprint { time_zone }),
        )
    }
}

#[tokio::test]
async fn key_survives_restart_in_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");

    let first = Harness::new(Arc::new(JsonFileKeyValueStore::new(&path)));
    let outcome = first.store_key("Europe/Berlin").execute("sk-live-42").await.unwrap();
    assert_eq!(outcome, StoreOutcome::Encrypted);

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(!on_disk.contains("sk-live-42"));
    assert!(on_disk.contains(ENCRYPTED_STORAGE_KEY));

    let second = Harness::new(Arc::new(JsonFileKeyValueStore::new(&path)));
    match second.restore_key("Europe/Berlin").execute().await.unwrap() {
        RestoreOutcome::Restored { key, encrypted, .. } => {
            assert_eq!(key.expose(), "sk-live-42");
            assert!(encrypted);
        }
        other => panic!("expected restored key, got {other:?}"),
    }
}

#[tokio::test]
async fn moved_environment_needs_reentry_then_new_key_replaces_blob() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let harness = Harness::new(store.clone());

    harness.store_key("Europe/Berlin").execute("sk-old").await.unwrap();
    let old_blob = store.get(ENCRYPTED_STORAGE_KEY).unwrap();

    let outcome = harness.restore_key("Asia/Tokyo").execute().await.unwrap();
    assert!(matches!(outcome, RestoreOutcome::NeedsReentry));
    assert_eq!(store.get(ENCRYPTED_STORAGE_KEY).unwrap(), old_blob);

    harness.store_key("Asia/Tokyo").execute("sk-new").await.unwrap();
    let restored = harness.restore_key("Asia/Tokyo").execute().await.unwrap();
    assert_eq!(restored.key().map(|k| k.expose()), Some("sk-new"));
}

#[tokio::test]
async fn legacy_plaintext_key_is_migrated_on_restore() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    store.set(PLAINTEXT_STORAGE_KEY, "sk-legacy").unwrap();
    let harness = Harness::new(store.clone());

    let outcome = harness.restore_key("UTC").execute().await.unwrap();
    assert!(matches!(
        outcome,
        RestoreOutcome::Restored {
            encrypted: false,
            migrated: true,
            ..
        }
    ));
    assert_eq!(store.keys(), vec![ENCRYPTED_STORAGE_KEY.to_string()]);

    let again = harness.restore_key("UTC").execute().await.unwrap();
    assert!(matches!(
        again,
        RestoreOutcome::Restored { encrypted: true, .. }
    ));
}

#[tokio::test]
async fn clear_removes_every_entry() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let harness = Harness::new(store.clone());
    harness.store_key("UTC").execute("sk-1").await.unwrap();

    ClearApiKey::new(harness.repo()).execute().unwrap();

    assert!(store.keys().is_empty());
    let outcome = harness.restore_key("UTC").execute().await.unwrap();
    assert!(matches!(outcome, RestoreOutcome::NotStored));
}
