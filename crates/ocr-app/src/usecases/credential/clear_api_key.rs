use std::sync::Arc;

use tracing::{info, info_span};

use ocr_core::credential::CredentialState;
use ocr_core::ports::{CredentialStatePort, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ClearApiKeyError {
    #[error("failed to clear API key: {0}")]
    Storage(#[source] StorageError),
}

/// Remove both the encrypted and the plaintext entry.
pub struct ClearApiKey {
    credentials: Arc<dyn CredentialStatePort>,
}

impl ClearApiKey {
    pub fn new(credentials: Arc<dyn CredentialStatePort>) -> Self {
        Self { credentials }
    }

    pub fn execute(&self) -> Result<(), ClearApiKeyError> {
        let _span = info_span!("usecase.clear_api_key.execute").entered();

        self.credentials
            .save(&CredentialState::Absent)
            .map_err(ClearApiKeyError::Storage)?;
        info!("stored API key cleared");
        Ok(())
    }
}
