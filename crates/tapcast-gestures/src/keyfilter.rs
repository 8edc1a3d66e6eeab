//! Key auto-repeat suppression.

use tapcast_types::Intent;
use tracing::debug;

/// Suppresses duplicate key intents from input-method auto-repeat noise.
///
/// A keystroke is dropped when it repeats the immediately previous symbol
/// within the debounce window of that symbol's last emission. Alternating
/// symbols always pass, and the same symbol passes again once the window
/// elapses. State is explicit per filter instance, so independent input
/// surfaces can each carry their own.
#[derive(Debug)]
pub struct KeyRepeatFilter {
    debounce_ms: u64,
    last_symbol: Option<String>,
    last_emit_ms: u64,
}

impl KeyRepeatFilter {
    #[must_use]
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            last_symbol: None,
            last_emit_ms: 0,
        }
    }

    /// Process one keystroke; returns the intent to dispatch, if any.
    ///
    /// The previous-symbol record updates on every call; the emission time
    /// only when an intent is actually produced, so a suppressed repeat
    /// does not extend the window.
    pub fn keystroke(&mut self, symbol: &str, now_ms: u64) -> Option<Intent> {
        let repeated = self.last_symbol.as_deref() == Some(symbol);
        let within_window = now_ms.saturating_sub(self.last_emit_ms) < self.debounce_ms;
        self.last_symbol = Some(symbol.to_string());

        if repeated && within_window {
            debug!(symbol, "key repeat suppressed");
            return None;
        }
        self.last_emit_ms = now_ms;
        Some(Intent::KeyPress {
            symbol: symbol.to_string(),
        })
    }
}
