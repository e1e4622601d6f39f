//! Additive waveforms: sums of sine harmonics read from the sine table.
//!
//! ```text
//!   saw       −(2/π)  Σ  sin(2π·n·p) / n           n = 1, 2, 3, …
//!   square     (4/π)  Σ  sin(2π·n·p) / n           n = 1, 3, 5, …
//!   triangle   (8/π²) Σ  (−1)^((n−1)/2) sin(2π·n·p) / n²
//! ```
//!
//! The width acts as brightness and sets how many of [`MAX_HARMONICS`] are
//! summed. Band-limited renders also stop below Nyquist, so no harmonic can
//! alias. Each harmonic's phase is `frac(n·p)`, which keeps the partials
//! locked to the fundamental through sync and phase modulation.

use std::f32::consts::PI;

use crate::dsp::tables;

pub const MAX_HARMONICS: usize = 64;

/// Highest harmonic to sum for a given brightness and increment. Band-limited
/// sums keep only harmonics strictly below Nyquist.
#[inline]
pub fn harmonic_count<const BL: bool>(brightness: f32, inc: f32) -> usize {
    let wanted = (brightness.clamp(0.0, 1.0) * MAX_HARMONICS as f32) as usize;
    let wanted = wanted.max(1);
    if BL && inc > 0.0 {
        let mut below = (0.5 / inc) as usize;
        if below as f32 * inc >= 0.5 {
            below -= 1;
        }
        wanted.min(below).max(1)
    } else {
        wanted
    }
}

#[inline]
fn partial(p: f32, n: usize) -> f32 {
    let x = n as f32 * p;
    tables::sin(x - x.floor())
}

pub fn saw<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let count = harmonic_count::<BL>(w, inc);
    let sum: f32 = (1..=count).map(|n| partial(p, n) / n as f32).sum();
    -2.0 / PI * sum
}

pub fn square<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let count = harmonic_count::<BL>(w, inc);
    let sum: f32 = (1..=count).step_by(2).map(|n| partial(p, n) / n as f32).sum();
    4.0 / PI * sum
}

pub fn triangle<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let count = harmonic_count::<BL>(w, inc);
    let sum: f32 = (1..=count)
        .step_by(2)
        .map(|n| {
            let sign = if (n - 1) / 2 % 2 == 0 { 1.0 } else { -1.0 };
            sign * partial(p, n) / (n * n) as f32
        })
        .sum();
    8.0 / (PI * PI) * sum
}
