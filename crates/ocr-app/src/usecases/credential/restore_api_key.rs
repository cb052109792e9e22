use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use ocr_core::credential::{ApiKey, CredentialState};
use ocr_core::ports::{
    CredentialCipherPort, CredentialStatePort, DeviceFingerprintPort, StorageError,
};

#[derive(Debug, thiserror::Error)]
pub enum RestoreApiKeyError {
    #[error("failed to load stored API key: {0}")]
    Storage(#[source] StorageError),
}

#[derive(Debug)]
pub enum RestoreOutcome {
    /// No key was ever stored, or it was cleared.
    NotStored,
    Restored {
        key: ApiKey,
        /// Whether the key came from an encrypted blob.
        encrypted: bool,
        /// A plaintext key was re-stored encrypted during this call.
        migrated: bool,
    },
    /// The blob exists but cannot be opened on this device. It is left in
    /// place; storing a new key replaces it.
    NeedsReentry,
}

impl RestoreOutcome {
    pub fn key(&self) -> Option<&ApiKey> {
        match self {
            RestoreOutcome::Restored { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Load the stored API key at startup.
///
/// 启动时恢复 API key；明文存储的 key 会尝试迁移为加密存储。
pub struct RestoreApiKey {
    credentials: Arc<dyn CredentialStatePort>,
    cipher: Arc<dyn CredentialCipherPort>,
    fingerprint: Arc<dyn DeviceFingerprintPort>,
}

impl RestoreApiKey {
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

    pub async fn execute(&self) -> Result<RestoreOutcome, RestoreApiKeyError> {
        let span = info_span!("usecase.restore_api_key.execute");

        async {
            let state = self.credentials.load().map_err(RestoreApiKeyError::Storage)?;

            match state {
                CredentialState::Absent => {
                    debug!("no stored API key");
                    Ok(RestoreOutcome::NotStored)
                }
                CredentialState::Plaintext(key) => {
                    let migrated = self.migrate(&key).await;
                    Ok(RestoreOutcome::Restored {
                        key,
                        encrypted: false,
                        migrated,
                    })
                }
                CredentialState::Encrypted(blob) => {
                    let fingerprint = match self.fingerprint.current() {
                        Ok(fingerprint) => fingerprint,
                        Err(e) => {
                            warn!(error = %e, "cannot derive device fingerprint, API key must be re-entered");
                            return Ok(RestoreOutcome::NeedsReentry);
                        }
                    };

                    match self.cipher.decrypt(&blob, &fingerprint).await {
                        Ok(key) => {
                            info!("API key restored");
                            Ok(RestoreOutcome::Restored {
                                key,
                                encrypted: true,
                                migrated: false,
                            })
                        }
                        Err(e) => {
                            warn!(error = %e, "stored API key cannot be decrypted on this device");
                            Ok(RestoreOutcome::NeedsReentry)
                        }
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Best effort: any failure leaves the plaintext entry untouched.
    async fn migrate(&self, key: &ApiKey) -> bool {
        let fingerprint = match self.fingerprint.current() {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                warn!(error = %e, "plaintext API key not migrated");
                return false;
            }
        };

        let blob = match self.cipher.encrypt(key, &fingerprint).await {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "plaintext API key not migrated");
                return false;
            }
        };

        match self.credentials.save(&CredentialState::Encrypted(blob)) {
            Ok(()) => {
                info!("plaintext API key migrated to encrypted storage");
                true
            }
            Err(e) => {
                warn!(error = %e, "plaintext API key not migrated");
                false
            }
        }
    }
}
