//! Relay configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use tapcast_gestures::GestureConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub gestures: GestureConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// Relay network and runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL of the remote input server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            log_level: default_log_level(),
        }
    }
}

/// Haptic feedback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HapticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Pulse length for the hold transition, in ms.
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pulse_ms: default_pulse_ms(),
        }
    }
}

/// Input subsystem settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Explicit touchscreen device path; auto-detect when absent.
    #[serde(default)]
    pub device: Option<String>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_pulse_ms() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("server_url"));
        assert!(toml_str.contains("hold_ms = 750"));
    }

    #[test]
    fn parse_example_config() {
        let toml_str = r#"
[relay]
server_url = "http://192.168.0.123:3000"
log_level = "debug"

[gestures]
hold_ms = 600
scroll_jump_limit = 60

[haptics]
enabled = false

[input]
device = "/dev/input/event5"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.relay.server_url, "http://192.168.0.123:3000");
        assert_eq!(config.relay.log_level, "debug");
        assert_eq!(config.gestures.hold_ms, 600);
        assert_eq!(config.gestures.scroll_jump_limit, 60);
        // Unset gesture fields keep their defaults.
        assert_eq!(config.gestures.tap_ms, 200);
        assert!(!config.haptics.enabled);
        assert_eq!(config.haptics.pulse_ms, 50);
        assert_eq!(config.input.device.as_deref(), Some("/dev/input/event5"));
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.relay.server_url, "http://127.0.0.1:3000");
        assert!(config.haptics.enabled);
        assert!(config.input.device.is_none());
    }
}
