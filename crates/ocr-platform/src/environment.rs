//! Host environment signals for the device fingerprint.
//!
//! 采集主机环境信号：agent、locale、主机名、时区名与 UTC 偏移。
//!
//! The agent string carries the OS and architecture but no version number, so
//! an upgrade does not invalidate a stored key.

use chrono::{Local, Offset};

use ocr_core::crypto::{DeviceFingerprint, EnvironmentSignals, FingerprintError};
use ocr_core::ports::DeviceFingerprintPort;

const AGENT_PRODUCT: &str = "mistral-ocr-desk";
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];
const TIME_ZONE_VAR: &str = "TZ";
const UNKNOWN: &str = "und";

/// Collects [`EnvironmentSignals`] from the running host.
#[derive(Default)]
pub struct HostFingerprintAdapter;

impl HostFingerprintAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn collect(&self) -> Result<EnvironmentSignals, FingerprintError> {
        let display = gethostname::gethostname().to_string_lossy().into_owned();
        if display.is_empty() {
            return Err(FingerprintError::SignalsUnavailable(
                "host name is empty".to_string(),
            ));
        }

        let offset_seconds = Local::now().offset().fix().local_minus_utc();

        Ok(signals_from(
            |name| std::env::var(name).ok(),
            display,
            offset_seconds / 60,
        ))
    }
}

fn agent() -> String {
    format!(
        "{AGENT_PRODUCT} ({}; {})",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn signals_from(
    env: impl Fn(&str) -> Option<String>,
    display: String,
    utc_offset_minutes: i32,
) -> EnvironmentSignals {
    let non_empty = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let language = LOCALE_VARS
        .iter()
        .find_map(|name| non_empty(*name))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let time_zone = non_empty(TIME_ZONE_VAR).unwrap_or_default();

    EnvironmentSignals {
        agent: agent(),
        language,
        display,
        time_zone,
        utc_offset_minutes,
    }
}

impl DeviceFingerprintPort for HostFingerprintAdapter {
    fn current(&self) -> Result<DeviceFingerprint, FingerprintError> {
        let signals = self.collect()?;
        Ok(DeviceFingerprint::from_signals(&signals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn locale_precedence_follows_posix() {
        let env = env_of(&[("LANG", "de_DE.UTF-8"), ("LC_ALL", "fr_FR.UTF-8")]);
        let signals = signals_from(env, "host".to_string(), 0);
        assert_eq!(signals.language, "fr_FR.UTF-8");

        let env = env_of(&[("LC_ALL", " "), ("LANG", "de_DE.UTF-8")]);
        let signals = signals_from(env, "host".to_string(), 0);
        assert_eq!(signals.language, "de_DE.UTF-8");
    }

    #[test]
    fn missing_values_have_stable_placeholders() {
        let signals = signals_from(env_of(&[]), "host".to_string(), -300);
        assert_eq!(signals.language, "und");
        assert_eq!(signals.time_zone, "");
        assert_eq!(signals.utc_offset_minutes, -300);
        assert!(signals.agent.starts_with("mistral-ocr-desk ("));
        assert!(signals.agent.contains(std::env::consts::OS));
    }

    #[test]
    fn host_fingerprint_is_stable_within_a_process() {
        let adapter = HostFingerprintAdapter::new();
        let a = adapter.current().expect("fingerprint");
        let b = adapter.current().expect("fingerprint");
        assert_eq!(a.expose(), b.expose());
    }
}
