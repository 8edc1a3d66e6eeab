//! Touch surface abstraction for tapcast.
//!
//! This crate defines the [`TouchSurface`] trait that platform backends
//! implement to deliver the raw contact stream, the fire-and-forget
//! [`Haptics`] seam, and the monotonic clock backends stamp samples with.
//! The evdev (Linux) backend lives behind the `linux` feature; the `mock`
//! feature provides test backends.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tapcast_types::SurfaceEvent;
use tokio::sync::mpsc;

pub mod error;
#[cfg(feature = "linux")]
pub mod linux;
#[cfg(feature = "mock")]
pub mod mock;

pub use error::InputError;
#[cfg(feature = "linux")]
pub use linux::EvdevTouchscreen;

/// Delivers raw touch lifecycle events from a physical surface.
///
/// Implementations read the platform's touch stream, stamp each sample
/// with [`MonotonicClock`] milliseconds, and forward it through a channel.
#[async_trait]
pub trait TouchSurface: Send + 'static {
    /// Start delivering events to `tx`.
    async fn start(&mut self, tx: mpsc::Sender<SurfaceEvent>) -> Result<(), InputError>;

    /// Stop the backend and release its resources.
    async fn shutdown(&mut self) -> Result<(), InputError>;
}

/// Fire-and-forget haptic feedback.
///
/// Pulsed on the hold transition so the user feels the drag anchor engage.
/// No completion signal, no error path; a platform without a vibrator uses
/// [`NoopHaptics`].
pub trait Haptics: Send + Sync + 'static {
    fn pulse(&self, duration: Duration);
}

/// Haptics sink that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn pulse(&self, _duration: Duration) {}
}

/// Monotonic millisecond timestamp source.
///
/// Anchored at construction; never goes backwards, unaffected by wall-clock
/// adjustments. All touch and key samples are stamped from one clock so the
/// classifier's threshold arithmetic stays coherent.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
