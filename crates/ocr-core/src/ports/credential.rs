use async_trait::async_trait;

use crate::credential::{ApiKey, CredentialError, CredentialState, EncryptedCredential};
use crate::crypto::DeviceFingerprint;

use super::errors::StorageError;

/// Symmetric encryption of the API key under a passphrase.
///
/// Semantics:
/// - `encrypt` draws a fresh salt and IV on every call
/// - `decrypt` fails with [`CredentialError::DecryptionFailed`] when the tag
///   does not verify, never with corrupted plaintext
/// - No I/O
#[async_trait]
pub trait CredentialCipherPort: Send + Sync {
    async fn encrypt(
        &self,
        plaintext: &ApiKey,
        passphrase: &DeviceFingerprint,
    ) -> Result<EncryptedCredential, CredentialError>;

    async fn decrypt(
        &self,
        blob: &EncryptedCredential,
        passphrase: &DeviceFingerprint,
    ) -> Result<ApiKey, CredentialError>;
}

/// Persistence of the tagged [`CredentialState`].
///
/// Implementations keep the plaintext and encrypted storage keys mutually
/// exclusive: saving one variant removes the other, `Absent` removes both.
pub trait CredentialStatePort: Send + Sync {
    fn load(&self) -> Result<CredentialState, StorageError>;

    fn save(&self, state: &CredentialState) -> Result<(), StorageError>;
}
