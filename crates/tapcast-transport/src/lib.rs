//! Intent emission for tapcast.
//!
//! Defines the [`IntentEmitter`] trait the relay dispatches through, and the
//! [`HttpEmitter`] implementation that talks to the remote host's input
//! server. Calls are independent fire-and-forget requests: the relay never
//! queues, retries, or orders them beyond issuance order, and a failed call
//! is logged at the boundary without touching classifier state.

use async_trait::async_trait;
use serde::Deserialize;
use tapcast_types::{Intent, Point, ScreenSize};

pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;

pub use error::EmitterError;
pub use http::HttpEmitter;

/// Acknowledgment returned by the remote host for a typed key.
///
/// The relay ignores it; it exists because the wire returns one.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeKeyAck {
    pub message: String,
}

/// Sends classified intents to the remote host.
///
/// One operation per intent kind, plus the remote-state queries. All
/// mutating operations are idempotent-unsafe (repeating a move call moves
/// twice), which is why the classifier guarantees no duplicate emissions.
#[async_trait]
pub trait IntentEmitter: Send + Sync + 'static {
    /// Relative pointer movement.
    async fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), EmitterError>;

    /// Relative scroll.
    async fn scroll(&self, dx: i32, dy: i32) -> Result<(), EmitterError>;

    /// Left click.
    async fn click(&self) -> Result<(), EmitterError>;

    /// Right click.
    async fn right_click(&self) -> Result<(), EmitterError>;

    /// Press and hold the left button.
    async fn button_down(&self) -> Result<(), EmitterError>;

    /// Release the held button.
    async fn button_up(&self) -> Result<(), EmitterError>;

    /// Type a single key symbol.
    async fn type_key(&self, symbol: &str) -> Result<TypeKeyAck, EmitterError>;

    /// Current pointer position on the remote display.
    async fn pointer_position(&self) -> Result<Point, EmitterError>;

    /// Size of the remote display.
    async fn screen_size(&self) -> Result<ScreenSize, EmitterError>;
}

/// Dispatch one classified intent through an emitter.
///
/// Maps the intent to its remote operation; the key-press acknowledgment is
/// discarded.
pub async fn send_intent(emitter: &dyn IntentEmitter, intent: &Intent) -> Result<(), EmitterError> {
    match intent {
        Intent::Move { dx, dy } => emitter.move_pointer(*dx, *dy).await,
        Intent::Scroll { dx, dy } => emitter.scroll(*dx, *dy).await,
        Intent::Click => emitter.click().await,
        Intent::RightClick => emitter.right_click().await,
        Intent::HoldStart => emitter.button_down().await,
        Intent::HoldEnd => emitter.button_up().await,
        Intent::KeyPress { symbol } => emitter.type_key(symbol).await.map(|_| ()),
    }
}
