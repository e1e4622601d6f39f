//! Resonant multimode filter from two cascaded biquads.
//!
//! Both sections share one set of bilinear-transform coefficients:
//!
//! ```text
//!   k  = tan(π · fc / sr)        r = max(0.001, 2 · (1 − res))
//!   bh = 1 + r·k + k²
//!
//!   low-pass   b = [k², 2k², k²] / bh
//!   high-pass  b = [1, −2, 1] / bh
//!   band-pass  b = [r·k, 0, −r·k] / bh
//!   feedback   a = [2(k² − 1), 1 − r·k + k²] / bh
//! ```
//!
//! The 12 dB types run the first section only.

use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{BiQuadDf2, Filter};
use crate::MIN_FREQUENCY;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmSynthType {
    #[default]
    Lp24,
    Hp24,
    Bp24,
    Lp12,
    Hp12,
    Bp12,
}

impl AmSynthType {
    pub const ALL: [AmSynthType; 6] = [
        AmSynthType::Lp24,
        AmSynthType::Hp24,
        AmSynthType::Bp24,
        AmSynthType::Lp12,
        AmSynthType::Hp12,
        AmSynthType::Bp12,
    ];

    /// Map a host-side integer selector; out-of-range values fall back to `Lp24`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_else(|| {
            log::debug!("amsynth filter type {index} out of range, using {:?}", Self::default());
            Self::default()
        })
    }

    pub fn is_24db(self) -> bool {
        matches!(self, AmSynthType::Lp24 | AmSynthType::Hp24 | AmSynthType::Bp24)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmSynthFilter {
    sample_rate: f32,
    filter_type: AmSynthType,
    first: BiQuadDf2,
    second: BiQuadDf2,
}

impl AmSynthFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            filter_type: AmSynthType::default(),
            first: BiQuadDf2::new(),
            second: BiQuadDf2::new(),
        };
        filter.set_coefficients(1_000.0, 0.0);
        filter
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("amsynth filter", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
    }

    /// Takes effect on the next [`set_coefficients`](Self::set_coefficients).
    pub fn set_type(&mut self, filter_type: AmSynthType) {
        self.filter_type = filter_type;
    }

    pub fn filter_type(&self) -> AmSynthType {
        self.filter_type
    }

    /// `res` in `[0, 1]`. Cutoff is clamped below `0.45 · sr`.
    pub fn set_coefficients(&mut self, freq: f32, res: f32) {
        let fc = freq.clamp(MIN_FREQUENCY, 0.45 * self.sample_rate);
        let r = (2.0 * (1.0 - res.clamp(0.0, 1.0))).max(0.001);
        let k = (PI * fc / self.sample_rate).tan();
        let k2 = k * k;
        let bh = 1.0 + r * k + k2;

        let (b0, b1, b2) = match self.filter_type {
            AmSynthType::Lp24 | AmSynthType::Lp12 => {
                let b0 = k2 / bh;
                (b0, 2.0 * b0, b0)
            }
            AmSynthType::Hp24 | AmSynthType::Hp12 => (1.0 / bh, -2.0 / bh, 1.0 / bh),
            AmSynthType::Bp24 | AmSynthType::Bp12 => (r * k / bh, 0.0, -r * k / bh),
        };
        let a1 = 2.0 * (k2 - 1.0) / bh;
        let a2 = (1.0 - r * k + k2) / bh;

        self.first.set_coefficients(b0, b1, b2, a1, a2);
        self.second.set_coefficients(b0, b1, b2, a1, a2);
    }
}

impl Filter for AmSynthFilter {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let y = self.first.tick(input);
        if self.filter_type.is_24db() {
            self.second.tick(y)
        } else {
            y
        }
    }

    fn clear(&mut self) {
        self.first.clear();
        self.second.clear();
    }
}
