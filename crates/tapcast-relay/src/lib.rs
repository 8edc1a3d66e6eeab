//! Relay orchestration for tapcast.
//!
//! Wires a touch surface backend into the gesture classifier and fans the
//! classified intents out to the remote host, fire-and-forget. Also owns
//! the TOML configuration and its loading.

pub mod config;
pub mod error;
pub mod relay;
pub mod setup;

pub use config::Config;
pub use error::RelayError;
pub use relay::{Relay, RelayEvent};
