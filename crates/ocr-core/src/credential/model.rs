use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use super::secret::SecretString;

/// Storage key holding the key in plaintext (fallback mode).
pub const PLAINTEXT_STORAGE_KEY: &str = "mistral-api-key";
/// Storage key holding the base64 encrypted blob.
pub const ENCRYPTED_STORAGE_KEY: &str = "mistral-api-key-encrypted";

pub const SALT_LEN: usize = 16;
pub const IV_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication tag did not verify: wrong fingerprint or tampered blob.
    #[error("credential decryption failed")]
    DecryptionFailed,

    #[error("malformed credential blob: {0}")]
    MalformedBlob(String),
}

impl CredentialError {
    /// Malformed blobs are reported to callers as decryption failures.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(
            self,
            CredentialError::DecryptionFailed | CredentialError::MalformedBlob(_)
        )
    }
}

/// A Mistral API key.
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Trim user input. Blank input is not a key.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(SecretString::new(trimmed.to_string())))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.0).finish()
    }
}

/// Base64 blob laid out as `salt || iv || ciphertext‖tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedCredential {
    blob: String,
}

/// Decoded sections of an [`EncryptedCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobParts {
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
}

impl EncryptedCredential {
    /// Wrap a blob read from storage. The content is checked lazily by
    /// [`parts`](Self::parts).
    pub fn from_blob(blob: impl Into<String>) -> Self {
        Self { blob: blob.into() }
    }

    pub fn from_parts(parts: &BlobParts) -> Self {
        let mut raw = Vec::with_capacity(SALT_LEN + IV_LEN + parts.ciphertext.len());
        raw.extend_from_slice(&parts.salt);
        raw.extend_from_slice(&parts.iv);
        raw.extend_from_slice(&parts.ciphertext);
        Self {
            blob: STANDARD.encode(raw),
        }
    }

    pub fn as_blob(&self) -> &str {
        &self.blob
    }

    pub fn parts(&self) -> Result<BlobParts, CredentialError> {
        let raw = STANDARD
            .decode(self.blob.trim())
            .map_err(|e| CredentialError::MalformedBlob(format!("invalid base64: {e}")))?;

        if raw.len() < SALT_LEN + IV_LEN + TAG_LEN {
            return Err(CredentialError::MalformedBlob(format!(
                "blob is {} bytes, expected at least {}",
                raw.len(),
                SALT_LEN + IV_LEN + TAG_LEN
            )));
        }

        let (salt, rest) = raw.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        let mut parts = BlobParts {
            salt: [0u8; SALT_LEN],
            iv: [0u8; IV_LEN],
            ciphertext: ciphertext.to_vec(),
        };
        parts.salt.copy_from_slice(salt);
        parts.iv.copy_from_slice(iv);
        Ok(parts)
    }
}

/// What is persisted for the API key. Exactly one variant exists at a time.
#[derive(Debug)]
pub enum CredentialState {
    Absent,
    Plaintext(ApiKey),
    Encrypted(EncryptedCredential),
}

impl CredentialState {
    pub fn is_absent(&self) -> bool {
        matches!(self, CredentialState::Absent)
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, CredentialState::Encrypted(_))
    }
}
