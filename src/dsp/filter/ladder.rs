//! Four-stage ladder filters.
//!
//! ```text
//!            ┌──────────── k · s4 ◄──────────────────────┐
//!            ▼                                           │
//!   x ──► (−) ──► tanh ──► [1-pole] ──► [1-pole] ──► [1-pole] ──► [1-pole] ──►
//!                  s0        s1           s2           s3           s4
//! ```
//!
//! Both filters expose the taps `[s0, s1, s2, s3, s4]` and mix them with a
//! per-type weight vector, so the 6/12/18/24 dB low-passes, the 24 dB
//! high-pass, the band-passes and the notch all fall out of one recursion.
//!
//! * [`LadderFilter`] follows Stilson/Smith with Krajeski's compensated
//!   one-pole stages: a single saturator at the input, fitted polynomials
//!   for gain and resonance.
//! * [`HuovilainenFilter`] saturates every stage, runs 2x oversampled and
//!   reads the last stage through a half-sample delay.
//!
//! Cutoff is clamped to `0.99 · sr / 4`; above that the fitted
//! polynomials leave their valid range and the loop blows up.

use std::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{mix, Filter};
use crate::dsp::tables;
use crate::MIN_FREQUENCY;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderType {
    #[default]
    Lp24,
    Lp18,
    Lp12,
    Lp6,
    Hp24,
    Bp12,
    Bp18,
    Notch,
}

impl LadderType {
    pub const ALL: [LadderType; 8] = [
        LadderType::Lp24,
        LadderType::Lp18,
        LadderType::Lp12,
        LadderType::Lp6,
        LadderType::Hp24,
        LadderType::Bp12,
        LadderType::Bp18,
        LadderType::Notch,
    ];

    /// Map a host-side integer selector; out-of-range values fall back to `Lp24`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_else(|| {
            log::debug!("ladder type {index} out of range, using {:?}", Self::default());
            Self::default()
        })
    }

    /// Tap weights over `[s0, s1, s2, s3, s4]`.
    pub fn weights(self) -> [f32; 5] {
        match self {
            LadderType::Lp24 => [0.0, 0.0, 0.0, 0.0, 1.0],
            LadderType::Lp18 => [0.0, 0.0, 0.0, 1.0, 0.0],
            LadderType::Lp12 => [0.0, 0.0, 1.0, 0.0, 0.0],
            LadderType::Lp6 => [0.0, 1.0, 0.0, 0.0, 0.0],
            LadderType::Hp24 => [1.0, 0.0, 0.0, 0.0, -1.0],
            LadderType::Bp12 => [0.0, 0.0, -1.0, 0.0, 1.0],
            LadderType::Bp18 => [0.0, 0.0, 0.0, 1.0, -1.0],
            LadderType::Notch => [2.0 / 3.0, 0.0, 0.0, 1.0, -1.0],
        }
    }
}

fn clamp_cutoff(freq: f32, sample_rate: f32) -> f32 {
    freq.clamp(MIN_FREQUENCY, 0.99 * 0.25 * sample_rate)
}

/// Stilson/Krajeski ladder with an input saturator.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderFilter {
    sample_rate: f32,
    filter_type: LadderType,
    weights: [f32; 5],
    drive: f32,
    g: f32,
    gres: f32,
    stage_out: [f32; 5],
    stage_in: [f32; 4],
}

impl LadderFilter {
    /// Input gain compensation inside the feedback term.
    const GCOMP: f32 = 0.5;

    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            filter_type: LadderType::default(),
            weights: LadderType::default().weights(),
            drive: 1.0,
            g: 0.0,
            gres: 0.0,
            stage_out: [0.0; 5],
            stage_in: [0.0; 4],
        };
        filter.set_coefficients(1_000.0, 0.0);
        filter
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("ladder filter", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
    }

    pub fn set_type(&mut self, filter_type: LadderType) {
        self.filter_type = filter_type;
        self.weights = filter_type.weights();
    }

    pub fn filter_type(&self) -> LadderType {
        self.filter_type
    }

    /// Gain into the input saturator. `1.0` is clean for unit-level input.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive;
    }

    /// `res` in `[0, 1]`; self-oscillation sets in near 1.
    pub fn set_coefficients(&mut self, freq: f32, res: f32) {
        let wc = TAU * clamp_cutoff(freq, self.sample_rate) / self.sample_rate;
        let wc2 = wc * wc;
        let wc3 = wc2 * wc;
        let wc4 = wc3 * wc;
        self.g = 0.9892 * wc - 0.4342 * wc2 + 0.1381 * wc3 - 0.0202 * wc4;
        self.gres = res * (1.0029 + 0.0526 * wc - 0.926 * wc2 + 0.0218 * wc3);
    }

    /// The five stage outputs after the last `tick`.
    pub fn taps(&self) -> [f32; 5] {
        self.stage_out
    }
}

impl Filter for LadderFilter {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let s = &mut self.stage_out;
        let feedback = 4.0 * self.gres * (s[4] - Self::GCOMP * input);
        s[0] = tables::tanh(self.drive * (input - feedback));

        for i in 0..4 {
            s[i + 1] = self.g * (0.3 / 1.3 * s[i] + 1.0 / 1.3 * self.stage_in[i] - s[i + 1]) + s[i + 1];
            self.stage_in[i] = s[i];
        }

        mix(&self.weights, &self.stage_out)
    }

    fn clear(&mut self) {
        self.stage_out = [0.0; 5];
        self.stage_in = [0.0; 4];
    }
}

/// Huovilainen's nonlinear ladder, 2x oversampled.
#[derive(Debug, Clone, PartialEq)]
pub struct HuovilainenFilter {
    sample_rate: f32,
    filter_type: LadderType,
    weights: [f32; 5],
    tune: f32,
    res_quad: f32,
    stage: [f32; 4],
    stage_tanh: [f32; 3],
    // delay[0..4] stage memories, [4] last stage output, [5] half-sample output
    delay: [f32; 6],
    input_tap: f32,
}

impl HuovilainenFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            filter_type: LadderType::default(),
            weights: LadderType::default().weights(),
            tune: 0.0,
            res_quad: 0.0,
            stage: [0.0; 4],
            stage_tanh: [0.0; 3],
            delay: [0.0; 6],
            input_tap: 0.0,
        };
        filter.set_coefficients(1_000.0, 0.0);
        filter
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("huovilainen filter", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
    }

    pub fn set_type(&mut self, filter_type: LadderType) {
        self.filter_type = filter_type;
        self.weights = filter_type.weights();
    }

    pub fn filter_type(&self) -> LadderType {
        self.filter_type
    }

    pub fn set_coefficients(&mut self, freq: f32, res: f32) {
        let fc = clamp_cutoff(freq, self.sample_rate) / self.sample_rate;
        let fc2 = fc * fc;
        let fc3 = fc2 * fc;
        // Fitted corrections for cutoff and resonance.
        let fcr = 1.8730 * fc3 + 0.4955 * fc2 - 0.6490 * fc + 0.9988;
        let acr = -3.9364 * fc2 + 1.8409 * fc + 0.9968;
        // Half of fc at the oversampled rate.
        self.tune = 1.0 - (-(2.0 * PI) * (0.5 * fc) * fcr).exp();
        self.res_quad = 4.0 * res * acr;
    }

    pub fn taps(&self) -> [f32; 5] {
        [
            self.input_tap,
            self.stage[0],
            self.stage[1],
            self.stage[2],
            self.delay[5],
        ]
    }
}

impl Filter for HuovilainenFilter {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        for _ in 0..2 {
            let x = input - self.res_quad * self.delay[5];
            self.input_tap = x;
            self.stage[0] = self.delay[0] + self.tune * (tables::tanh(x) - self.stage_tanh[0]);
            self.delay[0] = self.stage[0];

            for k in 1..4 {
                self.stage_tanh[k - 1] = tables::tanh(self.stage[k - 1]);
                let own = if k != 3 {
                    self.stage_tanh[k]
                } else {
                    tables::tanh(self.delay[k])
                };
                self.stage[k] = self.delay[k] + self.tune * (self.stage_tanh[k - 1] - own);
                self.delay[k] = self.stage[k];
            }

            self.delay[5] = 0.5 * (self.stage[3] + self.delay[4]);
            self.delay[4] = self.stage[3];
        }

        mix(&self.weights, &self.taps())
    }

    fn clear(&mut self) {
        self.stage = [0.0; 4];
        self.stage_tanh = [0.0; 3];
        self.delay = [0.0; 6];
        self.input_tap = 0.0;
    }
}
