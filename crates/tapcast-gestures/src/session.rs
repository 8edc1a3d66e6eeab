//! Per-interaction session state.

use tapcast_types::Point;

/// State of one continuous touch interaction, from first contact to full
/// release or cancellation.
///
/// Exactly one session is live at a time; a contact start while a session
/// exists discards the prior one. The classifier owns the session and
/// mutates it on every move sample and contact-count change.
#[derive(Debug)]
pub struct TouchSession {
    /// Timestamp of the contact start, in ms.
    pub(crate) started_at: u64,
    /// Where the first contact landed.
    pub(crate) start_position: Point,
    /// Position at the last admitted sample. `None` until the first
    /// admitted sample seeds it, so the first delta is zero rather than a
    /// jump from the contact-start coordinate.
    pub(crate) last_position: Option<Point>,
    /// Position at the last move sample, admitted or not. Used for the
    /// end-of-gesture displacement check.
    pub(crate) last_observed: Option<Point>,
    /// Sub-unit delta accumulators, carried between emissions.
    pub(crate) acc_dx: f64,
    pub(crate) acc_dy: f64,
    /// Last emitted scroll delta pair, the baseline for jump rejection.
    pub(crate) prev_scroll: Option<(i32, i32)>,
    /// Whether the hold transition has fired.
    pub(crate) holding: bool,
    /// Latched when the contact count ever reaches two.
    pub(crate) saw_two_contacts: bool,
}

impl TouchSession {
    pub(crate) fn begin(position: Point, contacts: u8, now_ms: u64) -> Self {
        Self {
            started_at: now_ms,
            start_position: position,
            last_position: None,
            last_observed: None,
            acc_dx: 0.0,
            acc_dy: 0.0,
            prev_scroll: None,
            holding: false,
            saw_two_contacts: contacts >= 2,
        }
    }

    /// Per-axis displacement from the start position to the last observed
    /// sample.
    pub(crate) fn total_displacement(&self) -> (f64, f64) {
        let end = self.last_observed.unwrap_or(self.start_position);
        (
            (end.x - self.start_position.x).abs(),
            (end.y - self.start_position.y).abs(),
        )
    }
}
