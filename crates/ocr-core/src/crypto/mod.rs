mod device_fingerprint;

pub use device_fingerprint::{DeviceFingerprint, EnvironmentSignals, FingerprintError};
