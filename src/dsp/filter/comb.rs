//! Feed-forward comb: `y[n] = x[n] + amount · x[n − sr/fc]`.
//!
//! The delay is fractional (allpass-interpolated), so the comb teeth land on
//! exact multiples of `fc` rather than snapping to integer periods.

use super::Filter;
use crate::dsp::delay::{DelayA, DEFAULT_CAPACITY};
use crate::MIN_FREQUENCY;

#[derive(Debug, Clone, PartialEq)]
pub struct CombFilter {
    sample_rate: f32,
    amount: f32,
    delay: DelayA,
}

impl CombFilter {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_capacity(sample_rate, DEFAULT_CAPACITY)
    }

    /// `capacity` bounds the longest period, i.e. the lowest usable `fc`.
    pub fn with_capacity(sample_rate: f32, capacity: usize) -> Self {
        let mut comb = Self {
            sample_rate,
            amount: 0.0,
            delay: DelayA::with_capacity(capacity),
        };
        comb.set_coefficients(1_000.0, 0.0);
        comb
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("comb filter", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
    }

    /// `fc` is floored and the period clamped to the line's range.
    pub fn set_coefficients(&mut self, fc: f32, amount: f32) {
        let period = self.sample_rate / fc.max(MIN_FREQUENCY);
        self.delay.set_delay(period.clamp(1.0, self.delay.max_delay()));
        self.amount = amount;
    }

    /// Current period in samples.
    pub fn period(&self) -> f32 {
        self.delay.delay()
    }
}

impl Filter for CombFilter {
    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        input + self.amount * self.delay.process(input)
    }

    fn clear(&mut self) {
        self.delay.clear();
    }
}
