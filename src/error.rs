//! Errors raised while configuring the engine.
//!
//! Only setup paths return these. Once a component is built, processing
//! clamps its inputs and never fails.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("block size must be between 1 and {max}, got {got}")]
    InvalidBlockSize { got: usize, max: usize },

    #[error("delay capacity must be at least {min} samples, got {got}")]
    InvalidCapacity { got: usize, min: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
