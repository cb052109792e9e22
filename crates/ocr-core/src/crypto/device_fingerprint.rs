//! Device fingerprint used as the passphrase for the stored API key.
//!
//! 设备指纹：用作本地 API key 加密的口令材料。
//!
//! ```text
//! agent | language | display | time_zone | utc_offset_minutes
//!   -> SHA-256 -> lower-case hex (64 chars)
//! ```
//!
//! The fingerprint is computable by anyone running on the same host, so it
//! only keeps the key away from someone copying the storage file elsewhere.
//! It is never persisted and never logged.

use std::fmt;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::credential::SecretString;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// 无法采集环境信号
    #[error("environment signals unavailable: {0}")]
    SignalsUnavailable(String),
}

/// Locally observable environment attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSignals {
    pub agent: String,
    pub language: String,
    pub display: String,
    pub time_zone: String,
    pub utc_offset_minutes: i32,
}

impl EnvironmentSignals {
    fn canonical(&self) -> String {
        let offset = self.utc_offset_minutes.to_string();
        [
            self.agent.as_str(),
            self.language.as_str(),
            self.display.as_str(),
            self.time_zone.as_str(),
            offset.as_str(),
        ]
        .join("|")
    }
}

/// SHA-256 hex digest of [`EnvironmentSignals`].
pub struct DeviceFingerprint(SecretString);

impl DeviceFingerprint {
    pub fn from_signals(signals: &EnvironmentSignals) -> Self {
        let digest = Sha256::digest(signals.canonical().as_bytes());
        Self(SecretString::new(hex::encode(digest)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for DeviceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceFingerprint([REDACTED])")
    }
}
