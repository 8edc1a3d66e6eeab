//! Core relay event loop.

use std::sync::Arc;
use std::time::Duration;

use tapcast_gestures::{GestureClassifier, KeyRepeatFilter};
use tapcast_input::{Haptics, TouchSurface};
use tapcast_transport::{send_intent, IntentEmitter};
use tapcast_types::{Intent, SurfaceEvent, TouchPhase, TouchSample};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RelayError;

/// Events processed by the relay's main loop.
pub enum RelayEvent {
    /// A raw event from the touch surface backend.
    Surface(SurfaceEvent),
    /// Shutdown signal.
    Shutdown,
}

/// The tapcast relay.
///
/// Owns the gesture classifier and key-repeat filter and drives them from a
/// single consumer loop, so all gesture state updates are sequential. Only
/// the already-classified network calls run concurrently: each intent is
/// dispatched on its own task and a failure is logged without ever touching
/// classifier state. Delivery is at-most-once, best-effort.
pub struct Relay {
    config: Config,
    classifier: GestureClassifier,
    key_filter: KeyRepeatFilter,
    surface: Box<dyn TouchSurface>,
    emitter: Arc<dyn IntentEmitter>,
    haptics: Arc<dyn Haptics>,
    event_tx: mpsc::Sender<RelayEvent>,
    event_rx: mpsc::Receiver<RelayEvent>,
}

impl Relay {
    /// Create a new relay instance.
    pub fn new(
        config: Config,
        surface: Box<dyn TouchSurface>,
        emitter: Arc<dyn IntentEmitter>,
        haptics: Arc<dyn Haptics>,
    ) -> Self {
        let classifier = GestureClassifier::new(config.gestures.clone());
        let key_filter = KeyRepeatFilter::new(config.gestures.key_repeat_ms);
        let (event_tx, event_rx) = mpsc::channel(1024);

        Self {
            config,
            classifier,
            key_filter,
            surface,
            emitter,
            haptics,
            event_tx,
            event_rx,
        }
    }

    /// Get a clone of the event sender for feeding events into the relay.
    pub fn event_sender(&self) -> mpsc::Sender<RelayEvent> {
        self.event_tx.clone()
    }

    /// Run the relay event loop until shutdown.
    pub async fn run(&mut self) -> Result<(), RelayError> {
        // Start the surface backend and forward its stream into relay events.
        let (surface_tx, mut surface_rx) = mpsc::channel::<SurfaceEvent>(1024);
        self.surface.start(surface_tx).await?;

        let forward_tx = self.event_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = surface_rx.recv().await {
                if forward_tx.send(RelayEvent::Surface(event)).await.is_err() {
                    break;
                }
            }
        });

        info!(server = %self.config.relay.server_url, "relay running");

        while let Some(event) = self.event_rx.recv().await {
            match event {
                RelayEvent::Surface(surface_event) => self.handle_surface_event(surface_event),
                RelayEvent::Shutdown => {
                    info!("shutting down");
                    break;
                }
            }
        }

        self.shutdown().await
    }

    fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Touch(sample) => self.handle_touch(sample),
            SurfaceEvent::Key {
                symbol,
                timestamp_ms,
            } => {
                if let Some(intent) = self.key_filter.keystroke(&symbol, timestamp_ms) {
                    self.dispatch(intent);
                }
            }
        }
    }

    fn handle_touch(&mut self, sample: TouchSample) {
        let TouchSample {
            phase,
            position,
            contacts,
            timestamp_ms,
        } = sample;

        match phase {
            TouchPhase::Start => {
                self.classifier.contact_start(position, contacts, timestamp_ms);
            }
            TouchPhase::Move => {
                for intent in self.classifier.contact_move(position, contacts, timestamp_ms) {
                    self.dispatch(intent);
                }
            }
            TouchPhase::End => {
                if let Some(intent) = self.classifier.contact_end(timestamp_ms) {
                    self.dispatch(intent);
                }
            }
            TouchPhase::Cancel => {
                if let Some(intent) = self.classifier.contact_cancel() {
                    self.dispatch(intent);
                }
            }
        }
    }

    /// Fire-and-forget dispatch of one classified intent.
    fn dispatch(&self, intent: Intent) {
        if matches!(intent, Intent::HoldStart) && self.config.haptics.enabled {
            self.haptics
                .pulse(Duration::from_millis(self.config.haptics.pulse_ms));
        }

        debug!(intent = %intent, "dispatching");
        let emitter = Arc::clone(&self.emitter);
        tokio::spawn(async move {
            if let Err(e) = send_intent(emitter.as_ref(), &intent).await {
                warn!(kind = intent.kind(), error = %e, "intent dispatch failed");
            }
        });
    }

    async fn shutdown(&mut self) -> Result<(), RelayError> {
        self.surface.shutdown().await?;
        info!("relay shut down");
        Ok(())
    }
}
