//! The gesture classification state machine.

use tapcast_types::{Intent, Point};
use tracing::debug;

use crate::config::GestureConfig;
use crate::session::TouchSession;
use crate::throttle::SampleThrottler;

/// Classifies an ongoing touch interaction into discrete intents.
///
/// The four entry points mirror the touch lifecycle: start, move, end,
/// cancel. Each is a synchronous state update that returns the intents the
/// caller should dispatch; the classifier itself performs no I/O and never
/// blocks. A tap, a drag, and a hold all look identical at first; the
/// classifier commits only once the timing and displacement thresholds in
/// [`GestureConfig`] resolve the ambiguity.
#[derive(Debug)]
pub struct GestureClassifier {
    config: GestureConfig,
    throttle: SampleThrottler,
    session: Option<TouchSession>,
    /// Timestamp of the previous right-click emission. Lives outside the
    /// session: the debounce guards spacing between emissions, which spans
    /// session boundaries when a two-finger lift-off reports twice.
    last_right_click_ms: Option<u64>,
}

impl GestureClassifier {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        let throttle = SampleThrottler::new(config.sample_interval_ms);
        Self {
            config,
            throttle,
            session: None,
            last_right_click_ms: None,
        }
    }

    /// Whether a hold is currently active (button held down remotely).
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.holding)
    }

    /// Begin a new touch session, discarding any prior one.
    pub fn contact_start(&mut self, position: Point, contacts: u8, now_ms: u64) {
        if self.session.is_some() {
            debug!("contact start with live session, discarding prior state");
        }
        self.session = Some(TouchSession::begin(position, contacts, now_ms));
        self.throttle.reset(now_ms);
    }

    /// Process a move sample. The hot path.
    ///
    /// Returns the intents to dispatch: possibly a `HoldStart` when the
    /// hold threshold trips, followed by a `Move` or `Scroll` when the
    /// sample is admitted and the accumulated delta rounds to nonzero.
    pub fn contact_move(&mut self, position: Point, contacts: u8, now_ms: u64) -> Vec<Intent> {
        let mut intents = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return intents;
        };

        if contacts >= 2 {
            session.saw_two_contacts = true;
        }
        session.last_observed = Some(position);

        // Hold detection runs ahead of rate admission so a slow sample
        // stream cannot delay the transition.
        if !session.holding {
            let elapsed = now_ms.saturating_sub(session.started_at);
            let travel = session.start_position.distance_to(position);
            if elapsed > self.config.hold_ms && travel < self.config.hold_radius {
                session.holding = true;
                debug!(elapsed_ms = elapsed, "hold engaged");
                intents.push(Intent::HoldStart);
            }
        }

        if !self.throttle.admit(now_ms) {
            return intents;
        }

        // First admitted sample seeds the delta origin: the jump from the
        // contact-start coordinate must not become a move.
        let last = session.last_position.unwrap_or(position);
        session.acc_dx += position.x - last.x;
        session.acc_dy += position.y - last.y;
        session.last_position = Some(position);

        #[allow(clippy::cast_possible_truncation)]
        let dx = session.acc_dx.round() as i32;
        #[allow(clippy::cast_possible_truncation)]
        let dy = session.acc_dy.round() as i32;
        if dx == 0 && dy == 0 {
            return intents;
        }

        if contacts >= 2 {
            let (prev_dx, prev_dy) = session.prev_scroll.unwrap_or((0, 0));
            let jump = self.config.scroll_jump_limit;
            if (dx - prev_dx).abs() < jump && (dy - prev_dy).abs() < jump {
                session.prev_scroll = Some((dx, dy));
                if dx != 0 {
                    session.acc_dx = 0.0;
                }
                if dy != 0 {
                    session.acc_dy = 0.0;
                }
                intents.push(Intent::Scroll { dx, dy });
            } else {
                // A single corrupted sample (finger-lift glitch) would
                // otherwise land as a scroll spike. Drop it wholesale;
                // the baseline stays put so the next clean sample passes.
                debug!(dx, dy, prev_dx, prev_dy, "scroll jump rejected");
                session.acc_dx = 0.0;
                session.acc_dy = 0.0;
            }
        } else {
            if dx != 0 {
                session.acc_dx = 0.0;
            }
            if dy != 0 {
                session.acc_dy = 0.0;
            }
            intents.push(Intent::Move { dx, dy });
        }

        intents
    }

    /// End the interaction: resolve hold release or tap classification.
    pub fn contact_end(&mut self, now_ms: u64) -> Option<Intent> {
        let session = self.session.take()?;

        if session.holding {
            return Some(Intent::HoldEnd);
        }

        let duration = now_ms.saturating_sub(session.started_at);
        if duration >= self.config.tap_ms {
            return None;
        }
        let (dx, dy) = session.total_displacement();
        if dx >= self.config.tap_radius || dy >= self.config.tap_radius {
            return None;
        }

        if session.saw_two_contacts {
            let debounced = self.last_right_click_ms.is_some_and(|prev| {
                now_ms.saturating_sub(prev) < self.config.right_click_debounce_ms
            });
            if debounced {
                debug!("right click suppressed by debounce");
                return None;
            }
            self.last_right_click_ms = Some(now_ms);
            Some(Intent::RightClick)
        } else {
            Some(Intent::Click)
        }
    }

    /// Abort the interaction. Releases a live hold; never taps or clicks.
    pub fn contact_cancel(&mut self) -> Option<Intent> {
        let session = self.session.take()?;
        session.holding.then_some(Intent::HoldEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureConfig::default())
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn quick_stationary_contact_is_a_click() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        // The only sample merely seeds the delta origin.
        assert!(c.contact_move(p(102.0, 101.0), 1, 50).is_empty());
        assert_eq!(c.contact_end(120), Some(Intent::Click));
    }

    #[test]
    fn slow_contact_is_not_a_tap() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        assert_eq!(c.contact_end(200), None);
    }

    #[test]
    fn displaced_contact_is_not_a_tap() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        c.contact_move(p(130.0, 100.0), 1, 20);
        assert_eq!(c.contact_end(60), None);
    }

    #[test]
    fn two_finger_tap_is_a_right_click() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        c.contact_move(p(101.0, 100.0), 2, 30);
        assert_eq!(c.contact_end(80), Some(Intent::RightClick));
    }

    #[test]
    fn right_click_is_debounced_across_sessions() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 2, 0);
        assert_eq!(c.contact_end(80), Some(Intent::RightClick));

        // Duplicate lift-off arriving as a fresh short session.
        c.contact_start(p(100.0, 100.0), 2, 100);
        assert_eq!(c.contact_end(150), None);

        // Past the debounce window it fires again.
        c.contact_start(p(100.0, 100.0), 2, 300);
        assert_eq!(c.contact_end(340), Some(Intent::RightClick));
    }

    #[test]
    fn stationary_hold_emits_hold_start_then_end() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        // Within the window: nothing yet.
        assert!(c.contact_move(p(101.0, 100.0), 1, 700).is_empty());
        // Past 750 ms and still within the radius: hold engages once.
        let intents = c.contact_move(p(101.0, 100.0), 1, 800);
        assert_eq!(intents, vec![Intent::HoldStart]);
        assert!(c.is_holding());
        assert!(c.contact_move(p(101.0, 100.0), 1, 850).is_empty());
        // Release ends the hold; no click even though it was stationary.
        assert_eq!(c.contact_end(900), Some(Intent::HoldEnd));
        assert!(!c.is_holding());
    }

    #[test]
    fn moved_contact_never_holds() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        // 50 units of travel: the hold radius check fails for good.
        assert!(c.contact_move(p(150.0, 100.0), 1, 800).is_empty());
        assert!(!c.is_holding());
        assert_eq!(c.contact_end(900), None);
    }

    #[test]
    fn cancel_while_holding_releases_the_button() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        c.contact_move(p(100.0, 100.0), 1, 800);
        assert!(c.is_holding());
        assert_eq!(c.contact_cancel(), Some(Intent::HoldEnd));
    }

    #[test]
    fn cancel_never_clicks() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        assert_eq!(c.contact_cancel(), None);
    }

    #[test]
    fn first_admitted_sample_does_not_jump() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        // Far from the start coordinate, but it only seeds the origin.
        assert!(c.contact_move(p(500.0, 500.0), 1, 20).is_empty());
        // Subsequent deltas are relative to the seeded position.
        assert_eq!(
            c.contact_move(p(505.0, 503.0), 1, 40),
            vec![Intent::Move { dx: 5, dy: 3 }]
        );
    }

    #[test]
    fn samples_within_the_interval_are_coalesced() {
        let mut c = classifier();
        c.contact_start(p(0.0, 0.0), 1, 0);
        c.contact_move(p(10.0, 0.0), 1, 16);
        assert_eq!(
            c.contact_move(p(14.0, 0.0), 1, 32),
            vec![Intent::Move { dx: 4, dy: 0 }]
        );
        // 8 ms later: not admitted, delta parked in the accumulator.
        assert!(c.contact_move(p(20.0, 0.0), 1, 40).is_empty());
        // Next admitted sample carries both steps.
        assert_eq!(
            c.contact_move(p(23.0, 0.0), 1, 48),
            vec![Intent::Move { dx: 9, dy: 0 }]
        );
    }

    #[test]
    fn move_deltas_sum_to_net_displacement() {
        let mut c = classifier();
        c.contact_start(p(0.0, 0.0), 1, 0);
        c.contact_move(p(0.0, 0.0), 1, 16);

        let (mut sum_dx, mut sum_dy) = (0i64, 0i64);
        let mut now = 16;
        let mut pos = p(0.0, 0.0);
        for _ in 0..100 {
            now += 17;
            pos = p(pos.x + 2.0, pos.y - 3.0);
            for intent in c.contact_move(pos, 1, now) {
                if let Intent::Move { dx, dy } = intent {
                    sum_dx += i64::from(dx);
                    sum_dy += i64::from(dy);
                }
            }
        }
        // Whole-unit motion rounds losslessly: the emitted sum is exactly
        // the net displacement between first and last sample.
        assert_eq!(sum_dx, 200);
        assert_eq!(sum_dy, -300);
    }

    #[test]
    fn sub_unit_axis_keeps_accumulating() {
        let mut c = classifier();
        c.contact_start(p(0.0, 0.0), 1, 0);
        c.contact_move(p(0.0, 0.0), 1, 16);
        // dy creeps by 0.3 per admitted sample while dx strides.
        assert_eq!(
            c.contact_move(p(5.0, 0.3), 1, 33),
            vec![Intent::Move { dx: 5, dy: 0 }]
        );
        assert_eq!(
            c.contact_move(p(10.0, 0.6), 1, 50),
            vec![Intent::Move { dx: 5, dy: 1 }]
        );
    }

    #[test]
    fn two_contacts_scroll_instead_of_move() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 2, 0);
        c.contact_move(p(100.0, 100.0), 2, 16);
        assert_eq!(
            c.contact_move(p(100.0, 110.0), 2, 32),
            vec![Intent::Scroll { dx: 0, dy: 10 }]
        );
    }

    #[test]
    fn scroll_spike_is_suppressed() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 2, 0);
        c.contact_move(p(100.0, 100.0), 2, 16);
        assert_eq!(
            c.contact_move(p(100.0, 105.0), 2, 32),
            vec![Intent::Scroll { dx: 0, dy: 5 }]
        );
        // A finger-lift glitch teleports the contact: jump >= 40 from the
        // previous emitted pair is dropped.
        assert!(c.contact_move(p(100.0, 200.0), 2, 48).is_empty());
        // The next clean sample scrolls again.
        assert_eq!(
            c.contact_move(p(100.0, 206.0), 2, 64),
            vec![Intent::Scroll { dx: 0, dy: 6 }]
        );
    }

    #[test]
    fn contact_count_transition_switches_intent_kind() {
        let mut c = classifier();
        c.contact_start(p(0.0, 0.0), 1, 0);
        c.contact_move(p(0.0, 0.0), 1, 16);
        assert_eq!(
            c.contact_move(p(6.0, 0.0), 1, 32),
            vec![Intent::Move { dx: 6, dy: 0 }]
        );
        // Second finger lands: same accumulators, scroll output.
        assert_eq!(
            c.contact_move(p(6.0, 8.0), 2, 48),
            vec![Intent::Scroll { dx: 0, dy: 8 }]
        );
        // Second finger lifts: back to move output.
        assert_eq!(
            c.contact_move(p(11.0, 8.0), 1, 64),
            vec![Intent::Move { dx: 5, dy: 0 }]
        );
    }

    #[test]
    fn new_start_discards_previous_session() {
        let mut c = classifier();
        c.contact_start(p(0.0, 0.0), 1, 0);
        c.contact_move(p(0.0, 0.0), 1, 16);
        c.contact_move(p(30.0, 0.0), 2, 32);

        c.contact_start(p(500.0, 500.0), 1, 1000);
        // The old session's two-finger history is gone: this is a plain tap.
        assert_eq!(c.contact_end(1050), Some(Intent::Click));
    }

    #[test]
    fn move_without_session_is_ignored() {
        let mut c = classifier();
        assert!(c.contact_move(p(10.0, 10.0), 1, 100).is_empty());
        assert_eq!(c.contact_end(200), None);
        assert_eq!(c.contact_cancel(), None);
    }

    #[test]
    fn hold_and_admitted_move_can_share_a_sample() {
        let mut c = classifier();
        c.contact_start(p(100.0, 100.0), 1, 0);
        c.contact_move(p(100.0, 100.0), 1, 16);
        // Stationary past the hold window, then the same sample that trips
        // the hold also carries an admitted (zero-ish) delta; drag begins
        // with the very next sample.
        let intents = c.contact_move(p(104.0, 100.0), 1, 800);
        assert_eq!(intents, vec![Intent::HoldStart, Intent::Move { dx: 4, dy: 0 }]);
        assert_eq!(
            c.contact_move(p(110.0, 100.0), 1, 820),
            vec![Intent::Move { dx: 6, dy: 0 }]
        );
        assert_eq!(c.contact_end(900), Some(Intent::HoldEnd));
    }
}
