//! Mock input backends for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tapcast_types::SurfaceEvent;
use tokio::sync::mpsc;

use crate::error::InputError;
use crate::{Haptics, TouchSurface};

// ---------------------------------------------------------------------------
// MockSurface
// ---------------------------------------------------------------------------

/// Mock touch surface for testing.
///
/// Returns a `mpsc::Sender<SurfaceEvent>` that tests use to inject events.
/// When `start()` is called, a task forwards injected events to the relay's
/// channel.
pub struct MockSurface {
    feed_rx: Option<mpsc::Receiver<SurfaceEvent>>,
    shutdown: Arc<AtomicBool>,
}

impl MockSurface {
    /// Create a new mock surface and a sender for injecting events.
    pub fn new() -> (Self, mpsc::Sender<SurfaceEvent>) {
        let (feed_tx, feed_rx) = mpsc::channel(1024);
        let surface = Self {
            feed_rx: Some(feed_rx),
            shutdown: Arc::new(AtomicBool::new(false)),
        };
        (surface, feed_tx)
    }
}

#[async_trait]
impl TouchSurface for MockSurface {
    async fn start(&mut self, tx: mpsc::Sender<SurfaceEvent>) -> Result<(), InputError> {
        let mut feed_rx = self.feed_rx.take().ok_or(InputError::AlreadyStarted)?;
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            while let Some(event) = feed_rx.recv().await {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), InputError> {
        self.shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockHaptics
// ---------------------------------------------------------------------------

/// Mock haptics sink recording every pulse for test observation.
#[derive(Debug, Default)]
pub struct MockHaptics {
    pulses: Arc<Mutex<Vec<Duration>>>,
}

impl MockHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clonable handle for observing pulses from tests.
    #[must_use]
    pub fn handle(&self) -> MockHapticsHandle {
        MockHapticsHandle {
            pulses: Arc::clone(&self.pulses),
        }
    }
}

impl Haptics for MockHaptics {
    fn pulse(&self, duration: Duration) {
        self.pulses.lock().unwrap().push(duration);
    }
}

/// Clonable observer handle for [`MockHaptics`].
#[derive(Debug, Clone)]
pub struct MockHapticsHandle {
    pulses: Arc<Mutex<Vec<Duration>>>,
}

impl MockHapticsHandle {
    /// Snapshot of all recorded pulses.
    #[must_use]
    pub fn pulses(&self) -> Vec<Duration> {
        self.pulses.lock().unwrap().clone()
    }
}
