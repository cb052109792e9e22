//! Hand-written port fakes shared by the use case tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use ocr_core::credential::{ApiKey, CredentialError, CredentialState, EncryptedCredential};
use ocr_core::crypto::{DeviceFingerprint, EnvironmentSignals, FingerprintError};
use ocr_core::file_validation::FileSource;
use ocr_core::ocr::OcrRequest;
use ocr_core::ports::{
    ClipboardError, ClipboardImage, ClipboardImagePort, ClockPort, ContentReadError,
    CredentialCipherPort, CredentialStatePort, DeviceFingerprintPort, FileContentPort, OcrApiError,
    OcrApiPort, StorageError,
};

/// Credential store that mirrors the two storage keys.
#[derive(Default)]
pub struct MemoryCredentials {
    plaintext: Mutex<Option<String>>,
    encrypted: Mutex<Option<String>>,
    fail_saves: bool,
    saves: Mutex<usize>,
}

impl MemoryCredentials {
    pub fn with_plaintext(value: &str) -> Self {
        let store = Self::default();
        *store.plaintext.lock().unwrap() = Some(value.to_string());
        store
    }

    pub fn with_encrypted(blob: &str) -> Self {
        let store = Self::default();
        *store.encrypted.lock().unwrap() = Some(blob.to_string());
        store
    }

    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn plaintext(&self) -> Option<String> {
        self.plaintext.lock().unwrap().clone()
    }

    pub fn encrypted(&self) -> Option<String> {
        self.encrypted.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl CredentialStatePort for MemoryCredentials {
    fn load(&self) -> Result<CredentialState, StorageError> {
        if let Some(blob) = self.encrypted() {
            return Ok(CredentialState::Encrypted(EncryptedCredential::from_blob(blob)));
        }
        Ok(self
            .plaintext()
            .and_then(|p| ApiKey::parse(&p))
            .map(CredentialState::Plaintext)
            .unwrap_or(CredentialState::Absent))
    }

    fn save(&self, state: &CredentialState) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        *self.saves.lock().unwrap() += 1;

        let (plaintext, encrypted) = match state {
            CredentialState::Absent => (None, None),
            CredentialState::Plaintext(key) => (Some(key.expose().to_string()), None),
            CredentialState::Encrypted(blob) => (None, Some(blob.as_blob().to_string())),
        };
        *self.plaintext.lock().unwrap() = plaintext;
        *self.encrypted.lock().unwrap() = encrypted;
        Ok(())
    }
}

/// Reversible toy cipher: `fake:<fingerprint prefix>:<reversed key>`.
#[derive(Default)]
pub struct FakeCipher {
    fail_encrypt: bool,
}

impl FakeCipher {
    pub fn failing_encrypt() -> Self {
        Self { fail_encrypt: true }
    }
}

fn fp_tag(fp: &DeviceFingerprint) -> &str {
    &fp.expose()[..8]
}

#[async_trait]
impl CredentialCipherPort for FakeCipher {
    async fn encrypt(
        &self,
        plaintext: &ApiKey,
        passphrase: &DeviceFingerprint,
    ) -> Result<EncryptedCredential, CredentialError> {
        if self.fail_encrypt {
            return Err(CredentialError::EncryptionFailed("no crypto backend".to_string()));
        }
        let reversed: String = plaintext.expose().chars().rev().collect();
        Ok(EncryptedCredential::from_blob(format!(
            "fake:{}:{reversed}",
            fp_tag(passphrase)
        )))
    }

    async fn decrypt(
        &self,
        blob: &EncryptedCredential,
        passphrase: &DeviceFingerprint,
    ) -> Result<ApiKey, CredentialError> {
        let mut parts = blob.as_blob().splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("fake"), Some(tag), Some(reversed)) if tag == fp_tag(passphrase) => {
                let key: String = reversed.chars().rev().collect();
                ApiKey::parse(&key).ok_or(CredentialError::DecryptionFailed)
            }
            (Some("fake"), _, _) => Err(CredentialError::DecryptionFailed),
            _ => Err(CredentialError::MalformedBlob("not a fake blob".to_string())),
        }
    }
}

pub struct FakeFingerprint {
    zone: Option<String>,
}

impl FakeFingerprint {
    pub fn fixed(zone: &str) -> Self {
        Self {
            zone: Some(zone.to_string()),
        }
    }

    pub fn unavailable() -> Self {
        Self { zone: None }
    }
}

impl DeviceFingerprintPort for FakeFingerprint {
    fn current(&self) -> Result<DeviceFingerprint, FingerprintError> {
        let zone = self
            .zone
            .clone()
            .ok_or_else(|| FingerprintError::SignalsUnavailable("no host".to_string()))?;
        Ok(DeviceFingerprint::from_signals(&EnvironmentSignals {
            agent: "test".to_string(),
            language: "en".to_string(),
            display: "host".to_string(),
            time_zone: zone,
            utc_offset_minutes: 0,
        }))
    }
}

/// Serves headers from memory sources and fails on path sources.
pub struct MemoryContent;

#[async_trait]
impl FileContentPort for MemoryContent {
    async fn read_prefix(&self, source: &FileSource, len: usize) -> Result<Vec<u8>, ContentReadError> {
        match source {
            FileSource::Memory(bytes) => Ok(bytes[..bytes.len().min(len)].to_vec()),
            FileSource::Path(path) => Err(ContentReadError::Io(format!(
                "{} unavailable",
                path.display()
            ))),
        }
    }

    async fn read_all(&self, source: &FileSource) -> Result<Bytes, ContentReadError> {
        match source {
            FileSource::Memory(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => Err(ContentReadError::NotFound(path.clone())),
        }
    }
}

/// Replays canned responses and records requests.
#[derive(Default)]
pub struct ScriptedOcrApi {
    responses: Mutex<VecDeque<Result<serde_json::Value, OcrApiError>>>,
    requests: Mutex<Vec<OcrRequest>>,
}

impl ScriptedOcrApi {
    pub fn replying(response: Result<serde_json::Value, OcrApiError>) -> Self {
        let api = Self::default();
        api.responses.lock().unwrap().push_back(response);
        api
    }

    pub fn requests(&self) -> Vec<OcrRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrApiPort for ScriptedOcrApi {
    async fn process(
        &self,
        _api_key: &ApiKey,
        request: &OcrRequest,
    ) -> Result<serde_json::Value, OcrApiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OcrApiError::Transport("no scripted response".to_string())))
    }
}

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

pub struct FakeClipboard(pub Result<Option<ClipboardImage>, String>);

impl ClipboardImagePort for FakeClipboard {
    fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        self.0.clone().map_err(ClipboardError::ReadFailed)
    }
}
