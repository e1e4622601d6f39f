//! Reverb - Room Simulation via a Feedback Delay Network
//!
//! Reverb simulates the sound of a space by creating many delayed, filtered
//! reflections of the input signal. Here eight delay lines feed each other
//! through a lossless mixing matrix, so every echo spawns echoes on every
//! other line and the density grows quickly.
//!
//! # Architecture
//!
//! ```text
//!                                        ┌──────── feedback matrix ────────┐
//!                                        ↓                                 │
//! in ──→ [pre-delay] ──→ [HP] → [LP] ──┬→ [AP 0] ─(+)─→ [line 0] → [damp] ─┤──→ even → L
//!                                      ├→ [AP 1] ─(+)─→ [line 1] → [damp] ─┤──→ odd  → R
//!                                      ├→  ...                              │
//!                                      └→ [AP 7] ─(+)─→ [line 7] → [damp] ─┘
//! ```
//!
//! ## Feedback Matrix
//!
//! Each line is fed the average of all damped line outputs minus its own:
//!
//! ```text
//! junction = ¼ · Σ dₖ
//! inₖ      = APₖ(x) + g · (junction − dₖ)
//! ```
//!
//! The matrix `¼·11ᵀ − I` is orthogonal for eight lines, so with `g < 1` the
//! network always decays.
//!
//! ## Line Modulation
//!
//! Each line's length wobbles by a fraction of a millisecond at its own rate
//! and start phase, and each feedback sample is scaled by `1 − ε·u` with `u`
//! uniform noise. Both break up the metallic ringing of fixed lengths.
//!
//! ## Diffusion
//!
//! A Schroeder allpass on every line input smears the attack before it
//! reaches the network. Adjacent lines use opposite-sign coefficients.
//!
//! ```text
//! y[n] = -g * x[n] + x[n - delay] + g * y[n - delay]
//! ```
//!
//! # Parameters
//!
//! - **Pre-delay**: Gap before the first reflection, up to 0.5 s
//! - **Decay**: Feedback gain `g` in `[0, 1)` (higher = longer tail)
//! - **Damping**: Corner of the per-line lowpass (lower = darker tail)
//! - **Tone**: Highpass and lowpass on the input

use super::{samples_for, Effect};
use crate::dsp::delay::{Delay, DelayL};
use crate::dsp::filter::{Filter, OnePole, PoleZero};
use crate::dsp::{tables, NoiseSource};

pub const LINES: usize = 8;

/// Line lengths in samples at 44.1 kHz.
const BASE_DELAYS: [f32; LINES] = [2473.0, 2767.0, 3217.0, 3557.0, 3907.0, 4127.0, 2143.0, 1933.0];
/// Modulation depth per line, seconds.
const MOD_DEPTHS: [f32; LINES] = [0.0010, 0.0011, 0.0017, 0.0006, 0.0010, 0.0011, 0.0017, 0.0006];
/// Modulation rate per line, Hz.
const MOD_RATES: [f32; LINES] = [3.100, 3.500, 1.110, 3.973, 2.341, 1.897, 0.891, 3.221];
/// Diffuser lengths in samples at 44.1 kHz.
const DIFFUSER_DELAYS: [f32; LINES] = [142.0, 107.0, 379.0, 277.0, 211.0, 163.0, 331.0, 239.0];
const DIFFUSION: f32 = 0.6;

const REFERENCE_RATE: f32 = 44_100.0;
const MAX_PRE_DELAY_SECONDS: f32 = 0.5;
const MAX_DECAY: f32 = 0.999;
const DITHER: f32 = 1.0e-4;
const OUTPUT_GAIN: f32 = 0.5;

/// Schroeder allpass diffuser.
#[derive(Debug, Clone, PartialEq)]
struct Diffuser {
    buffer: Vec<f32>,
    write_pos: usize,
    coefficient: f32,
}

impl Diffuser {
    fn new(delay_samples: usize, coefficient: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            coefficient,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let output = -self.coefficient * input + delayed;
        self.buffer[self.write_pos] = input + self.coefficient * output;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    delay: DelayL,
    damping: OnePole,
    diffuser: Diffuser,
    base: f32,
    depth: f32,
    phase: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reverb {
    sample_rate: f32,
    pre_delay_seconds: f32,
    decay: f32,
    damping_hz: f32,
    highpass_hz: f32,
    lowpass_hz: f32,
    wet: f32,

    pre_delay: Delay,
    highpass: PoleZero,
    lowpass: OnePole,
    lines: [Line; LINES],
    rng: NoiseSource,
}

fn build_lines(sample_rate: f32) -> [Line; LINES] {
    let scale = sample_rate / REFERENCE_RATE;
    std::array::from_fn(|k| {
        let depth = MOD_DEPTHS[k] * sample_rate;
        let capacity = samples_for(BASE_DELAYS[k] / REFERENCE_RATE + MOD_DEPTHS[k], sample_rate) + 2;
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        Line {
            delay: DelayL::with_capacity(capacity),
            damping: OnePole::new(0.0),
            diffuser: Diffuser::new((DIFFUSER_DELAYS[k] * scale).round() as usize, sign * DIFFUSION),
            base: BASE_DELAYS[k] * scale,
            depth,
            phase: 0.0,
        }
    })
}

impl Reverb {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut reverb = Self {
            sample_rate,
            pre_delay_seconds: 0.0,
            decay: 0.7,
            damping_hz: 6_000.0,
            highpass_hz: 40.0,
            lowpass_hz: 12_000.0,
            wet: 0.3,
            pre_delay: Delay::with_capacity(samples_for(MAX_PRE_DELAY_SECONDS, sample_rate) + 1),
            highpass: PoleZero::new(),
            lowpass: OnePole::new(0.0),
            lines: build_lines(sample_rate),
            rng: NoiseSource::new(seed),
        };
        reverb.update();
        reverb.reset();
        reverb
    }

    /// `pre_delay` in seconds; `decay` in `[0, 1)`; corners in Hz; `wet` in `[0, 1]`.
    pub fn set_coefficients(
        &mut self,
        pre_delay: f32,
        decay: f32,
        damping_hz: f32,
        highpass_hz: f32,
        lowpass_hz: f32,
        wet: f32,
    ) {
        self.pre_delay_seconds = pre_delay.clamp(0.0, MAX_PRE_DELAY_SECONDS);
        self.decay = decay.clamp(0.0, MAX_DECAY);
        self.damping_hz = damping_hz;
        self.highpass_hz = highpass_hz;
        self.lowpass_hz = lowpass_hz;
        self.wet = wet.clamp(0.0, 1.0);
        self.update();
    }

    /// Pick a new dither and modulation sequence, then reset.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
        self.reset();
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    fn update(&mut self) {
        let sr = self.sample_rate;
        self.pre_delay.set_delay((self.pre_delay_seconds * sr).round() as usize);
        self.highpass.set_highpass(self.highpass_hz, sr);
        self.lowpass.set_lowpass(self.lowpass_hz, sr);
        for line in &mut self.lines {
            line.damping.set_lowpass(self.damping_hz, sr);
        }
    }

    #[inline]
    fn modulated_delay(line: &Line) -> f32 {
        line.base + line.depth * tables::sin(line.phase)
    }
}

impl Effect for Reverb {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("reverb", sample_rate) {
            return;
        }
        log::debug!("reverb: sample rate {} -> {}", self.sample_rate, sample_rate);
        self.sample_rate = sample_rate;
        self.pre_delay.set_max(samples_for(MAX_PRE_DELAY_SECONDS, sample_rate) + 1);
        self.lines = build_lines(sample_rate);
        self.update();
        self.reset();
    }

    /// Clear every buffer and replay the noise sequence from the seed.
    fn reset(&mut self) {
        self.pre_delay.clear();
        self.highpass.clear();
        self.lowpass.clear();
        self.rng.reset();
        for line in &mut self.lines {
            line.damping.clear();
            line.diffuser.clear();
            line.phase = self.rng.unipolar();
            line.delay.clear();
            line.delay.set_delay(Self::modulated_delay(line));
        }
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let sr = self.sample_rate;
        let mut damped = [0.0f32; LINES];

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mono = 0.5 * (*l + *r);
            let x = self.lowpass.tick(self.highpass.tick(self.pre_delay.process(mono)));

            let mut out_l = 0.0;
            let mut out_r = 0.0;
            for (k, line) in self.lines.iter_mut().enumerate() {
                line.delay.set_delay(Self::modulated_delay(line));
                line.phase += MOD_RATES[k] / sr;
                line.phase -= line.phase.floor();

                let out = line.delay.next_out();
                if k % 2 == 0 {
                    out_l += out;
                } else {
                    out_r += out;
                }
                damped[k] = line.damping.tick(out) * (1.0 - DITHER * self.rng.unipolar());
            }

            let junction = 0.25 * damped.iter().sum::<f32>();
            for (line, d) in self.lines.iter_mut().zip(damped) {
                let diffused = line.diffuser.process(x);
                line.delay.process(diffused + self.decay * (junction - d));
            }

            *l += self.wet * OUTPUT_GAIN * out_l;
            *r += self.wet * OUTPUT_GAIN * out_r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_signals::{energy, impulse};
    use super::*;

    fn tail(decay: f32, len: usize) -> (Vec<f32>, Vec<f32>) {
        let mut reverb = Reverb::new(44_100.0, 3);
        reverb.set_coefficients(0.0, decay, 10_000.0, 20.0, 18_000.0, 1.0);
        let (mut l, mut r) = impulse(len);
        reverb.process(&mut l, &mut r);
        (l, r)
    }

    #[test]
    fn matrix_is_lossless() {
        let d = [0.3, -1.2, 0.7, 0.05, -0.4, 0.9, -0.6, 0.2];
        let junction = 0.25 * d.iter().sum::<f32>();
        let mixed: Vec<f32> = d.iter().map(|x| junction - x).collect();
        assert!((energy(&mixed) - energy(&d)).abs() < 1e-5);
    }

    #[test]
    fn diffuser_passes_all_energy() {
        for coefficient in [DIFFUSION, -DIFFUSION] {
            let mut diffuser = Diffuser::new(37, coefficient);
            let response: Vec<f32> = (0..4096).map(|i| diffuser.process(if i == 0 { 1.0 } else { 0.0 })).collect();
            assert!((energy(&response) - 1.0).abs() < 1e-3, "{}", energy(&response));
        }
    }

    #[test]
    fn tail_energy_decays_window_by_window() {
        const WINDOW: usize = 8192;
        let (l, r) = tail(0.8, WINDOW * 8);
        let windows: Vec<f32> = (1..8)
            .map(|w| energy(&l[w * WINDOW..(w + 1) * WINDOW]) + energy(&r[w * WINDOW..(w + 1) * WINDOW]))
            .collect();
        assert!(windows[0] > 1e-4, "{windows:?}");
        for pair in windows.windows(2) {
            assert!(pair[1] < pair[0], "{windows:?}");
        }
    }

    #[test]
    fn stays_bounded_for_any_decay_below_one() {
        for decay in [0.0, 0.3, 0.7, 0.95, 0.999] {
            let (l, r) = tail(decay, 44_100 * 3);
            assert!(l.iter().chain(&r).all(|x| x.is_finite() && x.abs() < 10.0), "decay {decay}");
        }
    }

    #[test]
    fn pre_delay_holds_back_the_tail() {
        let mut reverb = Reverb::new(10_000.0, 1);
        reverb.set_coefficients(0.1, 0.5, 4_000.0, 20.0, 4_500.0, 1.0);
        let (mut l, mut r) = impulse(4_000);
        reverb.process(&mut l, &mut r);
        assert!(l[1..1_000].iter().chain(&r[1..1_000]).all(|&x| x == 0.0));
        assert!(l[1_000..].iter().any(|&x| x != 0.0));
        assert!(r[1_000..].iter().any(|&x| x != 0.0));
    }

    #[test]
    fn channels_are_decorrelated() {
        let (l, r) = tail(0.7, 20_000);
        assert_ne!(&l[1..], &r[1..]);
    }

    #[test]
    fn same_seed_same_tail() {
        assert_eq!(tail(0.9, 10_000), tail(0.9, 10_000));
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut reverb = Reverb::new(48_000.0, 77);
        reverb.set_coefficients(0.02, 0.85, 5_000.0, 60.0, 10_000.0, 0.4);
        let fresh = reverb.clone();
        let (mut l, mut r) = impulse(20_000);
        reverb.process(&mut l, &mut r);
        reverb.reset();
        reverb.reset();
        assert_eq!(reverb, fresh);
    }

    #[test]
    fn reseeding_changes_the_tail() {
        let mut reverb = Reverb::new(44_100.0, 3);
        reverb.set_coefficients(0.0, 0.9, 10_000.0, 20.0, 18_000.0, 1.0);
        let (mut a_l, mut a_r) = impulse(10_000);
        reverb.process(&mut a_l, &mut a_r);

        reverb.set_seed(4);
        assert_eq!(reverb.seed(), 4);
        let (mut b_l, mut b_r) = impulse(10_000);
        reverb.process(&mut b_l, &mut b_r);
        assert_ne!(a_l, b_l);
    }
}
