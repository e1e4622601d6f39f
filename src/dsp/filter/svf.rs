use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{mix, Filter};
use crate::MIN_FREQUENCY;

/*
| type     | passes          | rejects      | Chamberlin mix | trapezoidal mix     |
| -------- | --------------- | ------------ | -------------- | ------------------- |
| low-pass | below cutoff    | above cutoff | low            | v2                  |
| high-pass| above cutoff    | below cutoff | high           | v0 − k·v1 − v2      |
| band-pass| around cutoff   | elsewhere    | band           | v1                  |
| notch    | outside         | around       | notch          | v0 − k·v1           |
| peak     | boosts cutoff   | -            | low − high     | −v0 + k·v1 + 2·v2   |
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvfType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
    Peak,
}

impl SvfType {
    pub const ALL: [SvfType; 5] = [
        SvfType::LowPass,
        SvfType::HighPass,
        SvfType::BandPass,
        SvfType::Notch,
        SvfType::Peak,
    ];

    /// Map a host-side integer selector; out-of-range values fall back to `LowPass`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_else(|| {
            log::debug!("svf type {index} out of range, using {:?}", Self::default());
            Self::default()
        })
    }

    /// Weights over `[low, high, band, notch]`.
    fn chamberlin_weights(self) -> [f32; 4] {
        match self {
            SvfType::LowPass => [1.0, 0.0, 0.0, 0.0],
            SvfType::HighPass => [0.0, 1.0, 0.0, 0.0],
            SvfType::BandPass => [0.0, 0.0, 1.0, 0.0],
            SvfType::Notch => [0.0, 0.0, 0.0, 1.0],
            SvfType::Peak => [1.0, -1.0, 0.0, 0.0],
        }
    }

    /// Weights over `[v0, v1, v2]` for damping `k`.
    fn trapezoidal_weights(self, k: f32) -> [f32; 3] {
        match self {
            SvfType::LowPass => [0.0, 0.0, 1.0],
            SvfType::HighPass => [1.0, -k, -1.0],
            SvfType::BandPass => [0.0, 1.0, 0.0],
            SvfType::Notch => [1.0, -k, 0.0],
            SvfType::Peak => [-1.0, k, 2.0],
        }
    }
}

/// Chamberlin state-variable filter, run twice per sample and averaged.
///
/// `drive` adds a cubic soft-clip inside the band integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVariableFilter {
    sample_rate: f32,
    filter_type: SvfType,
    weights: [f32; 4],
    freq: f32,
    damp: f32,
    drive: f32,
    low: f32,
    high: f32,
    band: f32,
    notch: f32,
}

impl StateVariableFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            sample_rate,
            filter_type: SvfType::default(),
            weights: SvfType::default().chamberlin_weights(),
            freq: 0.0,
            damp: 0.0,
            drive: 0.0,
            low: 0.0,
            high: 0.0,
            band: 0.0,
            notch: 0.0,
        };
        filter.set_coefficients(1_000.0, 0.0);
        filter
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("state variable filter", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
    }

    pub fn set_type(&mut self, filter_type: SvfType) {
        self.filter_type = filter_type;
        self.weights = filter_type.chamberlin_weights();
    }

    pub fn filter_type(&self) -> SvfType {
        self.filter_type
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive;
    }

    /// `res` in `[0, 1]`. Damping takes the tighter of two stability bounds.
    pub fn set_coefficients(&mut self, cutoff_hz: f32, res: f32) {
        let fc = cutoff_hz.max(MIN_FREQUENCY) / (2.0 * self.sample_rate);
        self.freq = 2.0 * (PI * fc.min(0.25)).sin();
        let res = res.clamp(0.0, 1.0);
        self.damp = (2.0 * (1.0 - res.powf(0.25))).min((2.0f32).min(2.0 / self.freq - 0.5 * self.freq));
    }

    #[inline]
    fn step(&mut self, input: f32) -> f32 {
        self.notch = input - self.damp * self.band;
        self.low += self.freq * self.band;
        self.high = self.notch - self.low;
        self.band = self.freq * self.high + self.band - self.drive * self.band * self.band * self.band;
        mix(&self.weights, &[self.low, self.high, self.band, self.notch])
    }
}

impl Filter for StateVariableFilter {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let first = self.step(input);
        let second = self.step(input);
        0.5 * first + 0.5 * second
    }

    fn clear(&mut self) {
        self.low = 0.0;
        self.high = 0.0;
        self.band = 0.0;
        self.notch = 0.0;
    }
}

/// Every response of one [`TrapezoidalSvf`] step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
    pub peak: f32,
}

/// Simper's trapezoidal-integrated state-variable filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TrapezoidalSvf {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    filter_type: SvfType,
    weights: [f32; 3],
    g: f32,
    k: f32,
}

impl TrapezoidalSvf {
    pub fn new(sample_rate: f32, filter_type: SvfType) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate,
            cutoff_hz: 1_000.0,
            resonance: 0.0,
            filter_type,
            weights: filter_type.trapezoidal_weights(2.0),
            g: 0.0,
            k: 2.0,
        };
        filter.set_coefficients(1_000.0, 0.0);
        filter
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, SvfType::LowPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn highpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, SvfType::HighPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn bandpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, SvfType::BandPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("trapezoidal svf", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
        self.set_coefficients(self.cutoff_hz, self.resonance);
    }

    pub fn set_type(&mut self, filter_type: SvfType) {
        self.filter_type = filter_type;
        self.weights = filter_type.trapezoidal_weights(self.k);
    }

    pub fn filter_type(&self) -> SvfType {
        self.filter_type
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// `resonance` in `[0, 1)`; clamped below 0.99 so damping stays positive.
    pub fn set_coefficients(&mut self, cutoff_hz: f32, resonance: f32) {
        self.cutoff_hz = cutoff_hz;
        self.resonance = resonance;

        let fc = cutoff_hz.clamp(MIN_FREQUENCY, 0.49 * self.sample_rate);
        self.g = (PI * fc / self.sample_rate).tan();
        self.k = 2.0 - 2.0 * resonance.clamp(0.0, 0.99);
        self.weights = self.filter_type.trapezoidal_weights(self.k);
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.set_coefficients(cutoff_hz, self.resonance);
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.set_coefficients(self.cutoff_hz, resonance);
    }

    #[inline]
    fn integrate(&mut self, v0: f32) -> (f32, f32) {
        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = v0 - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        (v1, v2)
    }

    /// Advance one sample and return every response at once.
    pub fn outputs(&mut self, sample: f32) -> SvfOutputs {
        let (v1, v2) = self.integrate(sample);
        let k = self.k;
        SvfOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
            peak: -sample + k * v1 + 2.0 * v2,
        }
    }
}

impl Filter for TrapezoidalSvf {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let (v1, v2) = self.integrate(input);
        mix(&self.weights, &[input, v1, v2])
    }

    fn clear(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
