//! API key model and its at-rest representation.

mod model;
mod secret;

pub use model::{
    ApiKey, BlobParts, CredentialError, CredentialState, EncryptedCredential, ENCRYPTED_STORAGE_KEY,
    IV_LEN, PLAINTEXT_STORAGE_KEY, SALT_LEN, TAG_LEN,
};
pub use secret::SecretString;
