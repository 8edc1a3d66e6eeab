//! Classified input intents.

use serde::{Deserialize, Serialize};

/// A discrete, classified user action ready for dispatch to the remote host.
///
/// Produced by the gesture classifier and key-repeat filter, consumed by the
/// intent emitter. Plain value type; passed by clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Relative pointer movement, in whole surface units.
    Move { dx: i32, dy: i32 },
    /// Relative scroll, in whole surface units.
    Scroll { dx: i32, dy: i32 },
    /// Left click.
    Click,
    /// Right click.
    RightClick,
    /// Press and keep the left button down (drag anchor).
    HoldStart,
    /// Release the held button.
    HoldEnd,
    /// Type a single key symbol.
    KeyPress { symbol: String },
}

impl Intent {
    /// Short name for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Scroll { .. } => "scroll",
            Self::Click => "click",
            Self::RightClick => "right-click",
            Self::HoldStart => "hold-start",
            Self::HoldEnd => "hold-end",
            Self::KeyPress { .. } => "key-press",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move { dx, dy } => write!(f, "move({dx}, {dy})"),
            Self::Scroll { dx, dy } => write!(f, "scroll({dx}, {dy})"),
            Self::KeyPress { symbol } => write!(f, "key({symbol})"),
            other => write!(f, "{}", other.kind()),
        }
    }
}
