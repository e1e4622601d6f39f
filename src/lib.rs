pub mod config;
pub mod dsp; // Oscillators, filters, delay lines, envelopes, LFOs
pub mod effects; // Stereo block processors and the effects rack
pub mod error;

pub use config::{check_sample_rate, EngineConfig};
pub use error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Lowest frequency accepted where a frequency is turned into a period.
pub(crate) const MIN_FREQUENCY: f32 = 0.01;
