use crate::crypto::{DeviceFingerprint, FingerprintError};

/// Computes the fingerprint of the current host on demand.
pub trait DeviceFingerprintPort: Send + Sync {
    fn current(&self) -> Result<DeviceFingerprint, FingerprintError>;
}
