//! Mock emitter for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tapcast_types::{Intent, Point, ScreenSize};

use crate::error::EmitterError;
use crate::{IntentEmitter, TypeKeyAck};

/// Shared state for observing what [`MockEmitter`] sent.
#[derive(Debug)]
struct MockEmitterState {
    sent: Vec<Intent>,
    failing: bool,
    pointer: Point,
    screen: ScreenSize,
}

impl Default for MockEmitterState {
    fn default() -> Self {
        Self {
            sent: Vec::new(),
            failing: false,
            pointer: Point::new(0.0, 0.0),
            screen: ScreenSize {
                width: 1920,
                height: 1080,
            },
        }
    }
}

/// Mock intent emitter recording every dispatched intent.
///
/// Tests observe the recording through a clonable handle, and can flip the
/// emitter into a failing mode to exercise the relay's at-most-once error
/// boundary.
#[derive(Debug, Default)]
pub struct MockEmitter {
    state: Arc<Mutex<MockEmitterState>>,
}

impl MockEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clonable handle for observing the emitter from tests.
    #[must_use]
    pub fn handle(&self) -> MockEmitterHandle {
        MockEmitterHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn record(&self, intent: Intent) -> Result<(), EmitterError> {
        let mut state = self.state.lock().unwrap();
        if state.failing {
            return Err(EmitterError::Status {
                endpoint: intent.kind().to_string(),
                status: 503,
            });
        }
        state.sent.push(intent);
        Ok(())
    }
}

/// Clonable observer handle for [`MockEmitter`].
#[derive(Debug, Clone)]
pub struct MockEmitterHandle {
    state: Arc<Mutex<MockEmitterState>>,
}

impl MockEmitterHandle {
    /// Snapshot of all recorded intents, in issuance order.
    #[must_use]
    pub fn sent(&self) -> Vec<Intent> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    /// Set the pointer position reported by the query operation.
    pub fn set_pointer(&self, pointer: Point) {
        self.state.lock().unwrap().pointer = pointer;
    }
}

#[async_trait]
impl IntentEmitter for MockEmitter {
    async fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), EmitterError> {
        self.record(Intent::Move { dx, dy })
    }

    async fn scroll(&self, dx: i32, dy: i32) -> Result<(), EmitterError> {
        self.record(Intent::Scroll { dx, dy })
    }

    async fn click(&self) -> Result<(), EmitterError> {
        self.record(Intent::Click)
    }

    async fn right_click(&self) -> Result<(), EmitterError> {
        self.record(Intent::RightClick)
    }

    async fn button_down(&self) -> Result<(), EmitterError> {
        self.record(Intent::HoldStart)
    }

    async fn button_up(&self) -> Result<(), EmitterError> {
        self.record(Intent::HoldEnd)
    }

    async fn type_key(&self, symbol: &str) -> Result<TypeKeyAck, EmitterError> {
        self.record(Intent::KeyPress {
            symbol: symbol.to_string(),
        })?;
        Ok(TypeKeyAck {
            message: "ok".to_string(),
        })
    }

    async fn pointer_position(&self) -> Result<Point, EmitterError> {
        Ok(self.state.lock().unwrap().pointer)
    }

    async fn screen_size(&self) -> Result<ScreenSize, EmitterError> {
        Ok(self.state.lock().unwrap().screen)
    }
}
