//! evdev multitouch touchscreen reader.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use evdev::{AbsoluteAxisCode, Device, EventSummary};
use tapcast_types::{Point, SurfaceEvent, TouchPhase, TouchSample};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::InputError;
use crate::{MonotonicClock, TouchSurface};

/// Linux touch surface reading a multitouch device via evdev.
///
/// Follows the kernel's type-B multitouch protocol: contact identity is
/// tracked per slot through `ABS_MT_TRACKING_ID`, and a sample is emitted
/// per `SYN_REPORT` frame with the primary contact position and the live
/// contact count.
pub struct EvdevTouchscreen {
    /// Explicit device path; auto-detected when `None`.
    path: Option<PathBuf>,
    clock: MonotonicClock,
    task: Option<JoinHandle<()>>,
    shutdown_tx: Option<tokio::sync::watch::Sender<bool>>,
}

impl EvdevTouchscreen {
    #[must_use]
    pub fn new(path: Option<PathBuf>, clock: MonotonicClock) -> Self {
        Self {
            path,
            clock,
            task: None,
            shutdown_tx: None,
        }
    }
}

/// Enumerate input devices that look like touchscreens.
///
/// A device qualifies when it advertises multitouch position axes.
pub fn enumerate_touchscreens() -> Vec<(PathBuf, String)> {
    let mut result = Vec::new();
    for (path, device) in evdev::enumerate() {
        let Some(axes) = device.supported_absolute_axes() else {
            continue;
        };
        if !axes.contains(AbsoluteAxisCode::ABS_MT_POSITION_X) {
            continue;
        }
        let name = device.name().unwrap_or("Unknown Device").to_string();
        result.push((path, name));
    }
    result
}

#[async_trait]
impl TouchSurface for EvdevTouchscreen {
    async fn start(&mut self, tx: mpsc::Sender<SurfaceEvent>) -> Result<(), InputError> {
        if self.task.is_some() {
            return Err(InputError::AlreadyStarted);
        }

        let path = match &self.path {
            Some(p) => p.clone(),
            None => {
                let candidates = enumerate_touchscreens();
                let (path, name) = candidates.into_iter().next().ok_or(InputError::NoTouchscreen)?;
                info!(device = %name, path = %path.display(), "auto-detected touchscreen");
                path
            }
        };

        let device = Device::open(&path).map_err(|e| InputError::DeviceOpen(e.to_string()))?;
        info!(device = device.name().unwrap_or("?"), "touchscreen opened");

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
        self.shutdown_tx = Some(shutdown_tx);
        let clock = self.clock;

        self.task = Some(tokio::spawn(async move {
            let mut stream = match device.into_event_stream() {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to create event stream");
                    return;
                }
            };

            let mut frame = FrameState::default();
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    result = stream.next_event() => {
                        match result {
                            Ok(ev) => {
                                if let Some(sample) = frame.apply(&ev, &clock) {
                                    debug!(?sample.phase, contacts = sample.contacts, "touch sample");
                                    if tx.send(SurfaceEvent::Touch(sample)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "touchscreen read error");
                                // A mid-contact read failure aborts the
                                // interaction rather than leaving a hold
                                // stuck down remotely.
                                if let Some(sample) = frame.cancel(&clock) {
                                    let _ = tx.send(SurfaceEvent::Touch(sample)).await;
                                }
                                break;
                            }
                        }
                    }
                }
            }
        }));

        info!("touch capture started");
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), InputError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        info!("touch capture shut down");
        Ok(())
    }
}

/// Per-frame accumulation of the evdev event stream.
///
/// evdev delivers axis updates one at a time and terminates each hardware
/// frame with `SYN_REPORT`; a [`TouchSample`] is produced per frame when
/// the contact set or the primary position changed.
#[derive(Debug, Default)]
struct FrameState {
    slot: u16,
    active: HashSet<u16>,
    x: f64,
    y: f64,
    position_dirty: bool,
    contacts_before: usize,
}

impl FrameState {
    /// Fold one evdev event; returns a sample at frame boundaries.
    fn apply(&mut self, ev: &evdev::InputEvent, clock: &MonotonicClock) -> Option<TouchSample> {
        match ev.destructure() {
            EventSummary::AbsoluteAxis(_, axis, value) => {
                match axis {
                    AbsoluteAxisCode::ABS_MT_SLOT => {
                        self.slot = u16::try_from(value).unwrap_or(0);
                    }
                    AbsoluteAxisCode::ABS_MT_TRACKING_ID => {
                        if value < 0 {
                            self.active.remove(&self.slot);
                        } else {
                            self.active.insert(self.slot);
                        }
                    }
                    AbsoluteAxisCode::ABS_X => {
                        self.x = f64::from(value);
                        self.position_dirty = true;
                    }
                    AbsoluteAxisCode::ABS_Y => {
                        self.y = f64::from(value);
                        self.position_dirty = true;
                    }
                    // Primary-contact position for devices that do not
                    // mirror slot 0 onto ABS_X/ABS_Y.
                    AbsoluteAxisCode::ABS_MT_POSITION_X if self.slot == 0 => {
                        self.x = f64::from(value);
                        self.position_dirty = true;
                    }
                    AbsoluteAxisCode::ABS_MT_POSITION_Y if self.slot == 0 => {
                        self.y = f64::from(value);
                        self.position_dirty = true;
                    }
                    _ => {}
                }
                None
            }
            EventSummary::Synchronization(..) => self.flush(clock),
            _ => None,
        }
    }

    /// Emit a sample for the completed frame, if anything changed.
    fn flush(&mut self, clock: &MonotonicClock) -> Option<TouchSample> {
        let contacts = self.active.len();
        let phase = if self.contacts_before == 0 && contacts > 0 {
            TouchPhase::Start
        } else if self.contacts_before > 0 && contacts == 0 {
            TouchPhase::End
        } else if contacts > 0 && (self.position_dirty || contacts != self.contacts_before) {
            TouchPhase::Move
        } else {
            self.position_dirty = false;
            return None;
        };

        self.contacts_before = contacts;
        self.position_dirty = false;
        Some(TouchSample {
            phase,
            position: Point::new(self.x, self.y),
            contacts: u8::try_from(contacts).unwrap_or(u8::MAX),
            timestamp_ms: clock.now_ms(),
        })
    }

    /// Abort a live interaction on stream failure.
    fn cancel(&mut self, clock: &MonotonicClock) -> Option<TouchSample> {
        if self.contacts_before == 0 {
            return None;
        }
        self.contacts_before = 0;
        self.active.clear();
        Some(TouchSample {
            phase: TouchPhase::Cancel,
            position: Point::new(self.x, self.y),
            contacts: 0,
            timestamp_ms: clock.now_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> MonotonicClock {
        MonotonicClock::new()
    }

    fn axis(frame: &mut FrameState, axis: AbsoluteAxisCode, value: i32, c: &MonotonicClock) {
        let ev = evdev::InputEvent::new(evdev::EventType::ABSOLUTE.0, axis.0, value);
        assert!(frame.apply(&ev, c).is_none());
    }

    fn sync(frame: &mut FrameState, c: &MonotonicClock) -> Option<TouchSample> {
        let ev = evdev::InputEvent::new(evdev::EventType::SYNCHRONIZATION.0, 0, 0);
        frame.apply(&ev, c)
    }

    #[test]
    fn contact_lifecycle_produces_start_move_end() {
        let c = clock();
        let mut frame = FrameState::default();

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 7, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_X, 120, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_Y, 300, &c);
        let sample = sync(&mut frame, &c).unwrap();
        assert_eq!(sample.phase, TouchPhase::Start);
        assert_eq!(sample.contacts, 1);
        assert_eq!(sample.position, Point::new(120.0, 300.0));

        axis(&mut frame, AbsoluteAxisCode::ABS_X, 130, &c);
        let sample = sync(&mut frame, &c).unwrap();
        assert_eq!(sample.phase, TouchPhase::Move);

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, -1, &c);
        let sample = sync(&mut frame, &c).unwrap();
        assert_eq!(sample.phase, TouchPhase::End);
        assert_eq!(sample.contacts, 0);
    }

    #[test]
    fn second_slot_raises_contact_count() {
        let c = clock();
        let mut frame = FrameState::default();

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 1, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_X, 100, &c);
        sync(&mut frame, &c).unwrap();

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_SLOT, 1, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 2, &c);
        let sample = sync(&mut frame, &c).unwrap();
        assert_eq!(sample.phase, TouchPhase::Move);
        assert_eq!(sample.contacts, 2);
    }

    #[test]
    fn quiet_frames_emit_nothing() {
        let c = clock();
        let mut frame = FrameState::default();
        assert!(sync(&mut frame, &c).is_none());

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 1, &c);
        sync(&mut frame, &c).unwrap();
        // Frame with no axis changes while touching: nothing to report.
        assert!(sync(&mut frame, &c).is_none());
    }

    #[test]
    fn cancel_only_fires_mid_contact() {
        let c = clock();
        let mut frame = FrameState::default();
        assert!(frame.cancel(&c).is_none());

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 1, &c);
        sync(&mut frame, &c).unwrap();
        let sample = frame.cancel(&c).unwrap();
        assert_eq!(sample.phase, TouchPhase::Cancel);
        assert!(frame.cancel(&c).is_none());
    }

    #[test]
    fn non_primary_slot_position_is_ignored() {
        let c = clock();
        let mut frame = FrameState::default();

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 1, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_MT_POSITION_X, 50, &c);
        sync(&mut frame, &c).unwrap();

        axis(&mut frame, AbsoluteAxisCode::ABS_MT_SLOT, 1, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 2, &c);
        axis(&mut frame, AbsoluteAxisCode::ABS_MT_POSITION_X, 900, &c);
        let sample = sync(&mut frame, &c).unwrap();
        // The second finger's coordinates do not displace the primary.
        assert_eq!(sample.position.x, 50.0);
    }
}
