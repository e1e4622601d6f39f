//! First- and second-order filter sections.
//!
//! All of these are direct-form difference equations with the coefficient
//! convention `y[n] = Σ b·x − Σ a·y` (so `a0 = 1` is implied). Only the
//! first-order sections and the DF-II biquad derive coefficients from musical
//! parameters; the rest take them as given.

use std::f32::consts::{PI, TAU};

use super::Filter;

/// `y[n] = b0·x[n] − a1·y[n−1]`
#[derive(Debug, Clone, PartialEq)]
pub struct OnePole {
    b0: f32,
    a1: f32,
    last: f32,
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl OnePole {
    pub fn new(pole: f32) -> Self {
        let mut filter = Self {
            b0: 1.0,
            a1: 0.0,
            last: 0.0,
        };
        filter.set_pole(pole);
        filter
    }

    pub fn set_coefficients(&mut self, b0: f32, a1: f32) {
        self.b0 = b0;
        self.a1 = a1;
    }

    /// Place the pole on the real axis, normalising peak gain to one.
    pub fn set_pole(&mut self, pole: f32) {
        self.b0 = if pole > 0.0 { 1.0 - pole } else { 1.0 + pole };
        self.a1 = -pole;
    }

    /// Unity-DC-gain lowpass with its -3 dB point near `cutoff_hz`.
    pub fn set_lowpass(&mut self, cutoff_hz: f32, sample_rate: f32) {
        let pole = (-TAU * cutoff_hz / sample_rate).exp();
        self.set_pole(pole);
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }
}

impl Filter for OnePole {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        self.last = self.b0 * input - self.a1 * self.last;
        self.last
    }

    fn clear(&mut self) {
        self.last = 0.0;
    }
}

/// `y[n] = b0·x[n] + b1·x[n−1]`
#[derive(Debug, Clone, PartialEq)]
pub struct OneZero {
    b0: f32,
    b1: f32,
    last: f32,
    prev_in: f32,
}

impl Default for OneZero {
    fn default() -> Self {
        Self::new(-1.0)
    }
}

impl OneZero {
    pub fn new(zero: f32) -> Self {
        let mut filter = Self {
            b0: 1.0,
            b1: 0.0,
            last: 0.0,
            prev_in: 0.0,
        };
        filter.set_zero(zero);
        filter
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32) {
        self.b0 = b0;
        self.b1 = b1;
    }

    /// Place the zero on the real axis with a peak gain of one.
    pub fn set_zero(&mut self, zero: f32) {
        self.b0 = if zero > 0.0 {
            1.0 / (1.0 + zero)
        } else {
            1.0 / (1.0 - zero)
        };
        self.b1 = -zero * self.b0;
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }
}

impl Filter for OneZero {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        self.last = self.b0 * input + self.b1 * self.prev_in;
        self.prev_in = input;
        self.last
    }

    fn clear(&mut self) {
        self.last = 0.0;
        self.prev_in = 0.0;
    }
}

/// `y[n] = b0·x[n] + b1·x[n−1] − a1·y[n−1]`
#[derive(Debug, Clone, PartialEq)]
pub struct PoleZero {
    b0: f32,
    b1: f32,
    a1: f32,
    last: f32,
    prev_in: f32,
}

impl Default for PoleZero {
    fn default() -> Self {
        Self::new()
    }
}

impl PoleZero {
    pub const DEFAULT_BLOCK_POLE: f32 = 0.99;

    /// Pass-through until configured.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            a1: 0.0,
            last: 0.0,
            prev_in: 0.0,
        }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, a1: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.a1 = a1;
    }

    /// First-order allpass: `H(z) = (c + z⁻¹) / (1 + c·z⁻¹)`.
    pub fn set_allpass(&mut self, coefficient: f32) {
        self.b0 = coefficient;
        self.b1 = 1.0;
        self.a1 = coefficient;
    }

    /// DC blocker with a zero at DC and a pole at `pole`.
    pub fn set_block_zero(&mut self, pole: f32) {
        self.b0 = 1.0;
        self.b1 = -1.0;
        self.a1 = -pole;
    }

    /// One-pole, one-zero highpass with unity gain at Nyquist.
    pub fn set_highpass(&mut self, cutoff_hz: f32, sample_rate: f32) {
        let pole = (-TAU * cutoff_hz / sample_rate).exp();
        let gain = 0.5 * (1.0 + pole);
        self.b0 = gain;
        self.b1 = -gain;
        self.a1 = -pole;
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }
}

impl Filter for PoleZero {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        self.last = self.b0 * input + self.b1 * self.prev_in - self.a1 * self.last;
        self.prev_in = input;
        self.last
    }

    fn clear(&mut self) {
        self.last = 0.0;
        self.prev_in = 0.0;
    }
}

/// `y[n] = b0·x[n] − a1·y[n−1] − a2·y[n−2]`
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPole {
    b0: f32,
    a1: f32,
    a2: f32,
    last: f32,
    last2: f32,
}

impl Default for TwoPole {
    fn default() -> Self {
        Self::new()
    }
}

impl TwoPole {
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            a1: 0.0,
            a2: 0.0,
            last: 0.0,
            last2: 0.0,
        }
    }

    pub fn set_coefficients(&mut self, b0: f32, a1: f32, a2: f32) {
        self.b0 = b0;
        self.a1 = a1;
        self.a2 = a2;
    }
}

impl Filter for TwoPole {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let y = self.b0 * input - self.a1 * self.last - self.a2 * self.last2;
        self.last2 = self.last;
        self.last = y;
        y
    }

    fn clear(&mut self) {
        self.last = 0.0;
        self.last2 = 0.0;
    }
}

/// `y[n] = b0·x[n] + b1·x[n−1] + b2·x[n−2]`
#[derive(Debug, Clone, PartialEq)]
pub struct TwoZero {
    b0: f32,
    b1: f32,
    b2: f32,
    prev_in: f32,
    prev_in2: f32,
}

impl Default for TwoZero {
    fn default() -> Self {
        Self::new()
    }
}

impl TwoZero {
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            prev_in: 0.0,
            prev_in2: 0.0,
        }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
    }
}

impl Filter for TwoZero {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let y = self.b0 * input + self.b1 * self.prev_in + self.b2 * self.prev_in2;
        self.prev_in2 = self.prev_in;
        self.prev_in = input;
        y
    }

    fn clear(&mut self) {
        self.prev_in = 0.0;
        self.prev_in2 = 0.0;
    }
}

/// Direct-form-I biquad.
#[derive(Debug, Clone, PartialEq)]
pub struct BiQuad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    prev_in: f32,
    prev_in2: f32,
    last: f32,
    last2: f32,
}

impl Default for BiQuad {
    fn default() -> Self {
        Self::new()
    }
}

impl BiQuad {
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            prev_in: 0.0,
            prev_in2: 0.0,
            last: 0.0,
            last2: 0.0,
        }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
        self.a1 = a1;
        self.a2 = a2;
    }
}

impl Filter for BiQuad {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let y = self.b0 * input + self.b1 * self.prev_in + self.b2 * self.prev_in2
            - self.a1 * self.last
            - self.a2 * self.last2;
        self.prev_in2 = self.prev_in;
        self.prev_in = input;
        self.last2 = self.last;
        self.last = y;
        y
    }

    fn clear(&mut self) {
        self.prev_in = 0.0;
        self.prev_in2 = 0.0;
        self.last = 0.0;
        self.last2 = 0.0;
    }
}

/// Transposed direct-form-II biquad with cookbook low/high-pass designs.
#[derive(Debug, Clone, PartialEq)]
pub struct BiQuadDf2 {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Default for BiQuadDf2 {
    fn default() -> Self {
        Self::new()
    }
}

impl BiQuadDf2 {
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
        self.a1 = a1;
        self.a2 = a2;
    }

    fn prewarp(cutoff_hz: f32, q: f32, sample_rate: f32) -> (f32, f32) {
        let w0 = TAU * cutoff_hz.clamp(1.0, 0.49 * sample_rate) / sample_rate;
        let alpha = w0.sin() / (2.0 * q.max(0.01));
        (w0.cos(), alpha)
    }

    pub fn set_lowpass(&mut self, cutoff_hz: f32, q: f32, sample_rate: f32) {
        let (cos_w0, alpha) = Self::prewarp(cutoff_hz, q, sample_rate);
        let a0 = 1.0 + alpha;
        let b1 = (1.0 - cos_w0) / a0;
        self.set_coefficients(
            0.5 * b1,
            b1,
            0.5 * b1,
            -2.0 * cos_w0 / a0,
            (1.0 - alpha) / a0,
        );
    }

    pub fn set_highpass(&mut self, cutoff_hz: f32, q: f32, sample_rate: f32) {
        let (cos_w0, alpha) = Self::prewarp(cutoff_hz, q, sample_rate);
        let a0 = 1.0 + alpha;
        let b1 = -(1.0 + cos_w0) / a0;
        self.set_coefficients(
            -0.5 * b1,
            b1,
            -0.5 * b1,
            -2.0 * cos_w0 / a0,
            (1.0 - alpha) / a0,
        );
    }
}

impl Filter for BiQuadDf2 {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let y = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * y + self.z2;
        self.z2 = self.b2 * input - self.a2 * y;
        y
    }

    fn clear(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// DC offset removal: `y[n] = x[n] − x[n−1] + R·y[n−1]`, corner at 20 Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct DcBlocker {
    r: f32,
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    pub const CORNER_HZ: f32 = 20.0;

    pub fn new(sample_rate: f32) -> Self {
        let mut blocker = Self {
            r: 0.0,
            x1: 0.0,
            y1: 0.0,
        };
        blocker.set_sample_rate(sample_rate);
        blocker
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("dc blocker", sample_rate) {
            return;
        }
        self.r = 1.0 - 2.0 * PI * Self::CORNER_HZ / sample_rate;
    }
}

impl Filter for DcBlocker {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let y = input - self.x1 + self.r * self.y1;
        self.x1 = input;
        self.y1 = y;
        y
    }

    fn clear(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}
