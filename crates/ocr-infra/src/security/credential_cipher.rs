use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use async_trait::async_trait;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use tracing::warn;
use zeroize::Zeroizing;

use ocr_core::credential::{
    ApiKey, BlobParts, CredentialError, EncryptedCredential, IV_LEN, SALT_LEN,
};
use ocr_core::crypto::DeviceFingerprint;
use ocr_core::ports::CredentialCipherPort;

pub const PBKDF2_ITERATIONS: u32 = 100_000;
const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 key derivation + AES-256-GCM.
///
/// Blob layout: `salt(16) || iv(12) || ciphertext‖tag`, base64. The KDF runs
/// on the blocking pool.
pub struct AesGcmCredentialCipher {
    iterations: u32,
}

impl AesGcmCredentialCipher {
    pub fn new() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }

    /// Blobs only decrypt under the iteration count they were written with.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl Default for AesGcmCredentialCipher {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_key(passphrase: &[u8], salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, &mut key[..]);
    key
}

fn encrypt_blocking(
    plaintext: &str,
    passphrase: &str,
    iterations: u32,
) -> Result<EncryptedCredential, CredentialError> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let key = derive_key(passphrase.as_bytes(), &salt, iterations);
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| CredentialError::EncryptionFailed(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| CredentialError::EncryptionFailed("AES-GCM encryption failed".to_string()))?;

    Ok(EncryptedCredential::from_parts(&BlobParts {
        salt,
        iv,
        ciphertext,
    }))
}

fn decrypt_blocking(
    blob: &EncryptedCredential,
    passphrase: &str,
    iterations: u32,
) -> Result<ApiKey, CredentialError> {
    let parts = blob.parts()?;

    let key = derive_key(passphrase.as_bytes(), &parts.salt, iterations);
    let cipher =
        Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CredentialError::DecryptionFailed)?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&parts.iv), parts.ciphertext.as_slice())
            .map_err(|_| CredentialError::DecryptionFailed)?,
    );

    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| CredentialError::MalformedBlob("plaintext is not UTF-8".to_string()))?;
    ApiKey::parse(text).ok_or_else(|| CredentialError::MalformedBlob("empty key".to_string()))
}

#[async_trait]
impl CredentialCipherPort for AesGcmCredentialCipher {
    async fn encrypt(
        &self,
        plaintext: &ApiKey,
        passphrase: &DeviceFingerprint,
    ) -> Result<EncryptedCredential, CredentialError> {
        let plaintext = Zeroizing::new(plaintext.expose().to_string());
        let passphrase = Zeroizing::new(passphrase.expose().to_string());
        let iterations = self.iterations;

        tokio::task::spawn_blocking(move || encrypt_blocking(&plaintext, &passphrase, iterations))
            .await
            .map_err(|e| CredentialError::EncryptionFailed(format!("cipher task failed: {e}")))?
    }

    async fn decrypt(
        &self,
        blob: &EncryptedCredential,
        passphrase: &DeviceFingerprint,
    ) -> Result<ApiKey, CredentialError> {
        let blob = blob.clone();
        let passphrase = Zeroizing::new(passphrase.expose().to_string());
        let iterations = self.iterations;

        tokio::task::spawn_blocking(move || decrypt_blocking(&blob, &passphrase, iterations))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "credential decrypt task failed");
                Err(CredentialError::DecryptionFailed)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use ocr_core::credential::TAG_LEN;
    use ocr_core::crypto::EnvironmentSignals;

    fn fingerprint(zone: &str) -> DeviceFingerprint {
        DeviceFingerprint::from_signals(&EnvironmentSignals {
            agent: "test-agent".to_string(),
            language: "en-US".to_string(),
            display: "host".to_string(),
            time_zone: zone.to_string(),
            utc_offset_minutes: 60,
        })
    }

    fn fast_cipher() -> AesGcmCredentialCipher {
        AesGcmCredentialCipher::with_iterations(1)
    }

    #[tokio::test]
    async fn round_trip_with_production_parameters() {
        let cipher = AesGcmCredentialCipher::new();
        let fp = fingerprint("Europe/Berlin");
        let key = ApiKey::parse("sk-mistral-0123456789").unwrap();

        let blob = cipher.encrypt(&key, &fp).await.expect("encrypt");
        let restored = cipher.decrypt(&blob, &fp).await.expect("decrypt");

        assert_eq!(restored.expose(), "sk-mistral-0123456789");
    }

    #[tokio::test]
    async fn round_trip_preserves_unusual_keys() {
        let cipher = fast_cipher();
        let fp = fingerprint("Europe/Berlin");
        let long = "k".repeat(65) + &"é".repeat(40);
        let cases = ["x", "clé-密钥-🔑-ключ", long.as_str()];

        for raw in cases {
            let key = ApiKey::parse(raw).unwrap();
            let blob = cipher.encrypt(&key, &fp).await.unwrap();
            let restored = cipher.decrypt(&blob, &fp).await.unwrap();
            assert_eq!(restored.expose(), raw);
        }
    }

    #[tokio::test]
    async fn blob_layout_is_salt_iv_ciphertext_tag() {
        let cipher = fast_cipher();
        let key = ApiKey::parse("abcd").unwrap();
        let blob = cipher.encrypt(&key, &fingerprint("UTC")).await.unwrap();

        let raw = STANDARD.decode(blob.as_blob()).unwrap();
        assert_eq!(raw.len(), SALT_LEN + IV_LEN + 4 + TAG_LEN);
    }

    #[tokio::test]
    async fn every_encryption_uses_fresh_salt_and_iv() {
        let cipher = fast_cipher();
        let fp = fingerprint("UTC");
        let key = ApiKey::parse("same-key").unwrap();

        let a = cipher.encrypt(&key, &fp).await.unwrap().parts().unwrap();
        let b = cipher.encrypt(&key, &fp).await.unwrap().parts().unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[tokio::test]
    async fn changed_fingerprint_fails_to_decrypt() {
        let cipher = fast_cipher();
        let key = ApiKey::parse("secret").unwrap();
        let blob = cipher.encrypt(&key, &fingerprint("UTC")).await.unwrap();

        let err = cipher
            .decrypt(&blob, &fingerprint("Asia/Tokyo"))
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::DecryptionFailed));
    }

    #[tokio::test]
    async fn any_flipped_ciphertext_bit_fails_verification() {
        let cipher = fast_cipher();
        let fp = fingerprint("UTC");
        let key = ApiKey::parse("k1").unwrap();
        let parts = cipher.encrypt(&key, &fp).await.unwrap().parts().unwrap();

        for byte in 0..parts.ciphertext.len() {
            for bit in 0..8 {
                let mut tampered = parts.clone();
                tampered.ciphertext[byte] ^= 1 << bit;
                let blob = EncryptedCredential::from_parts(&tampered);

                let result = cipher.decrypt(&blob, &fp).await;
                assert!(
                    matches!(result, Err(CredentialError::DecryptionFailed)),
                    "byte {byte} bit {bit} was not detected"
                );
            }
        }
    }

    #[tokio::test]
    async fn truncated_blob_is_malformed() {
        let cipher = fast_cipher();
        let blob = EncryptedCredential::from_blob(STANDARD.encode([0u8; 20]));

        let err = cipher.decrypt(&blob, &fingerprint("UTC")).await.unwrap_err();
        assert!(matches!(err, CredentialError::MalformedBlob(_)));
    }
}
