#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::MAX_BLOCK_SIZE;

/// Setup-time settings shared by every component a host builds.
///
/// The block size is the largest chunk handed to a `process` call. The seed
/// goes to the rack's reverb, whose modulation noise is the only random source
/// the rack owns. Oscillators and LFOs are built by the host and take their
/// own seeds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub block_size: usize,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            block_size: 64,
            seed: 0x5EED,
        }
    }
}

impl EngineConfig {
    pub fn new(sample_rate: f32, block_size: usize) -> Result<Self> {
        let config = Self {
            sample_rate,
            block_size,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate)?;
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize {
                got: self.block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        Ok(())
    }
}

/// A sample rate must be finite and positive.
pub fn check_sample_rate(sample_rate: f32) -> Result<f32> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(Error::InvalidSampleRate(sample_rate))
    }
}

/// Runtime rate changes can't fail; an invalid rate is logged and the
/// component keeps the one it has.
pub(crate) fn accept_sample_rate(component: &str, sample_rate: f32) -> bool {
    match check_sample_rate(sample_rate) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("{component}: {e}, keeping the previous rate");
            false
        }
    }
}
