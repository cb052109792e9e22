mod credential_cipher;

pub use credential_cipher::{AesGcmCredentialCipher, PBKDF2_ITERATIONS};
