//! Relay errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("input error: {0}")]
    Input(#[from] tapcast_input::InputError),

    #[error("emitter error: {0}")]
    Emitter(#[from] tapcast_transport::EmitterError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
