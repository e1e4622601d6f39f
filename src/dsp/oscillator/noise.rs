//! White, pink and filtered noise.
//!
//! Pink noise uses Paul Kellet's economy filter: three leaky integrators at
//! staggered poles over white noise, accurate to about ±0.5 dB above 9 Hz.
//! The filtered variants pass white noise through a trapezoidal SVF whose
//! cutoff follows the oscillator frequency and whose resonance follows the
//! width.

use crate::dsp::filter::{Filter, SvfType, TrapezoidalSvf};
use crate::dsp::NoiseSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Pink,
    LowPass,
    BandPass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoiseGenerator {
    rng: NoiseSource,
    pink: [f32; 3],
    filter: TrapezoidalSvf,
}

impl NoiseGenerator {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        Self {
            rng: NoiseSource::new(seed),
            pink: [0.0; 3],
            filter: TrapezoidalSvf::lowpass(sample_rate, 1_000.0),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.filter.set_sample_rate(sample_rate);
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Cutoff and resonance of the filtered colours, set once per block.
    pub fn set_filter(&mut self, color: NoiseColor, cutoff_hz: f32, resonance: f32) {
        let filter_type = match color {
            NoiseColor::BandPass => SvfType::BandPass,
            _ => SvfType::LowPass,
        };
        if self.filter.filter_type() != filter_type {
            self.filter.set_type(filter_type);
        }
        self.filter.set_coefficients(cutoff_hz, resonance);
    }

    #[inline]
    pub fn white(&mut self) -> f32 {
        self.rng.bipolar()
    }

    #[inline]
    pub fn pink(&mut self) -> f32 {
        let white = self.rng.bipolar();
        let [b0, b1, b2] = &mut self.pink;
        *b0 = 0.997_65 * *b0 + white * 0.099_046;
        *b1 = 0.963_00 * *b1 + white * 0.296_516_4;
        *b2 = 0.570_00 * *b2 + white * 1.052_691_3;
        (*b0 + *b1 + *b2 + white * 0.184_8) * 0.2
    }

    #[inline]
    pub fn filtered(&mut self) -> f32 {
        let white = self.rng.bipolar();
        self.filter.tick(white)
    }

    #[inline]
    pub fn next(&mut self, color: NoiseColor) -> f32 {
        match color {
            NoiseColor::White => self.white(),
            NoiseColor::Pink => self.pink(),
            NoiseColor::LowPass | NoiseColor::BandPass => self.filtered(),
        }
    }

    /// Restart the sequence and silence the colouring filters.
    pub fn reset(&mut self) {
        self.rng.reset();
        self.pink = [0.0; 3];
        self.filter.clear();
    }
}
