//! Touch lifecycle samples.
//!
//! Surface-agnostic representation of the raw contact stream a touch
//! backend delivers to the relay. One [`TouchSample`] per lifecycle
//! callback; the live contact count rides along on every sample.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Phase of a touch contact within an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchPhase {
    /// First contact landed; a new interaction begins.
    Start,
    /// A contact moved, or the contact count changed mid-interaction.
    Move,
    /// The last contact lifted; the interaction is over.
    End,
    /// The interaction was taken over or aborted by the host surface.
    Cancel,
}

/// One sample of the raw touch stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub phase: TouchPhase,
    /// Position of the primary contact.
    pub position: Point,
    /// Number of contacts currently on the surface.
    pub contacts: u8,
    /// Monotonic timestamp stamped by the backend, in milliseconds.
    pub timestamp_ms: u64,
}

/// An event delivered by a touch surface backend.
///
/// Touch and key input are parallel, independent paths: touch samples feed
/// the gesture classifier, key symbols feed the key-repeat filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    Touch(TouchSample),
    Key { symbol: String, timestamp_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_sample_serde_roundtrip() {
        let sample = TouchSample {
            phase: TouchPhase::Move,
            position: Point::new(120.0, 48.5),
            contacts: 2,
            timestamp_ms: 16_384,
        };
        let json = serde_json::to_string(&sample).unwrap();
        let decoded: TouchSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, decoded);
    }

    #[test]
    fn key_event_serde_roundtrip() {
        let event = SurfaceEvent::Key {
            symbol: "Backspace".to_string(),
            timestamp_ms: 99,
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: SurfaceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, decoded);
    }
}
