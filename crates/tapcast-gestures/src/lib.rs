//! Gesture classification core for tapcast.
//!
//! Consumes the raw touch lifecycle stream (contact start/move/end/cancel
//! plus live contact count) and produces a small, rate-limited vocabulary of
//! [`Intent`](tapcast_types::Intent)s. Purely synchronous state updates:
//! no I/O, no clocks; timestamps arrive with the samples.

pub mod classifier;
pub mod config;
pub mod keyfilter;
pub mod session;
pub mod throttle;

pub use classifier::GestureClassifier;
pub use config::GestureConfig;
pub use keyfilter::KeyRepeatFilter;
pub use throttle::SampleThrottler;
