//! Classification thresholds.

use serde::{Deserialize, Serialize};

/// Timing and displacement thresholds for gesture classification.
///
/// The defaults distinguish a deliberate press-and-hold from an in-progress
/// tap or pan (750 ms within 10 units), a tap from a drag that barely moved
/// (200 ms / 10 units), and bound move/scroll output to display refresh
/// cadence (16 ms). The tap window and the right-click debounce share a
/// default value but guard different conditions and are independent knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Press duration before a stationary contact becomes a hold, in ms.
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Maximum travel from the start position for hold detection, in units.
    #[serde(default = "default_hold_radius")]
    pub hold_radius: f64,
    /// Minimum spacing between admitted move samples, in ms.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// Maximum interaction duration for tap classification, in ms.
    #[serde(default = "default_tap_ms")]
    pub tap_ms: u64,
    /// Maximum per-axis displacement for tap classification, in units.
    #[serde(default = "default_tap_radius")]
    pub tap_radius: f64,
    /// Minimum spacing between right-click emissions, in ms.
    #[serde(default = "default_right_click_debounce_ms")]
    pub right_click_debounce_ms: u64,
    /// Per-axis scroll delta jump above which a sample is rejected, in units.
    #[serde(default = "default_scroll_jump_limit")]
    pub scroll_jump_limit: i32,
    /// Debounce window for repeated key symbols, in ms.
    #[serde(default = "default_key_repeat_ms")]
    pub key_repeat_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_ms: default_hold_ms(),
            hold_radius: default_hold_radius(),
            sample_interval_ms: default_sample_interval_ms(),
            tap_ms: default_tap_ms(),
            tap_radius: default_tap_radius(),
            right_click_debounce_ms: default_right_click_debounce_ms(),
            scroll_jump_limit: default_scroll_jump_limit(),
            key_repeat_ms: default_key_repeat_ms(),
        }
    }
}

fn default_hold_ms() -> u64 {
    750
}

fn default_hold_radius() -> f64 {
    10.0
}

fn default_sample_interval_ms() -> u64 {
    16
}

fn default_tap_ms() -> u64 {
    200
}

fn default_tap_radius() -> f64 {
    10.0
}

fn default_right_click_debounce_ms() -> u64 {
    200
}

fn default_scroll_jump_limit() -> i32 {
    40
}

fn default_key_repeat_ms() -> u64 {
    200
}
