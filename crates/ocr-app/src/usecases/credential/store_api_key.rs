use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use ocr_core::credential::{ApiKey, CredentialState};
use ocr_core::ports::{
    CredentialCipherPort, CredentialStatePort, DeviceFingerprintPort, StorageError,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreApiKeyError {
    #[error("failed to persist API key: {0}")]
    Storage(#[source] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Blank input: nothing is stored any more.
    Cleared,
    /// Stored as an encrypted blob.
    Encrypted,
    /// Encryption was unavailable; the key is stored in plaintext.
    PlaintextFallback { reason: String },
}

impl StoreOutcome {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, StoreOutcome::Encrypted)
    }
}

/// Persist the API key typed by the user.
///
/// ## Behavior
///
/// - Blank input clears the stored key
/// - Otherwise the key is encrypted under the device fingerprint
/// - Fingerprint or cipher failure falls back to plaintext and says so in the
///   outcome; only storage failures are errors
pub struct StoreApiKey {
    credentials: Arc<dyn CredentialStatePort>,
    cipher: Arc<dyn CredentialCipherPort>,
    fingerprint: Arc<dyn DeviceFingerprintPort>,
}

impl StoreApiKey {
    pub fn new(
        credentials: Arc<dyn CredentialStatePort>,
        cipher: Arc<dyn CredentialCipherPort>,
        fingerprint: Arc<dyn DeviceFingerprintPort>,
    ) -> Self {
        Self {
            credentials,
            cipher,
            fingerprint,
        }
    }

    pub async fn execute(&self, raw: &str) -> Result<StoreOutcome, StoreApiKeyError> {
        let span = info_span!("usecase.store_api_key.execute");

        async {
            let Some(key) = ApiKey::parse(raw) else {
                self.credentials
                    .save(&CredentialState::Absent)
                    .map_err(StoreApiKeyError::Storage)?;
                info!("blank API key, stored key cleared");
                return Ok(StoreOutcome::Cleared);
            };

            let encrypted = match self.fingerprint.current() {
                Ok(fingerprint) => self
                    .cipher
                    .encrypt(&key, &fingerprint)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match encrypted {
                Ok(blob) => {
                    self.credentials
                        .save(&CredentialState::Encrypted(blob))
                        .map_err(StoreApiKeyError::Storage)?;
                    info!("API key stored encrypted");
                    Ok(StoreOutcome::Encrypted)
                }
                Err(reason) => {
                    warn!(%reason, "API key encryption unavailable, storing plaintext");
                    self.credentials
                        .save(&CredentialState::Plaintext(key))
                        .map_err(StoreApiKeyError::Storage)?;
                    Ok(StoreOutcome::PlaintextFallback { reason })
                }
            }
        }
        .instrument(span)
        .await
    }
}
