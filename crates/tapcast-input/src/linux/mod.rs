//! evdev-based touch input for Linux.

mod touchscreen;

pub use touchscreen::{enumerate_touchscreens, EvdevTouchscreen};
