//! Polynomial band-limited step (PolyBLEP) residuals.
//!
//! A naive waveform jumps instantly at a discontinuity, which aliases. The
//! residual is the difference between an ideal band-limited step and the
//! naive one, approximated by a quadratic over the two samples around the
//! jump:
//!
//! ```text
//!   t ∈ (-1, 0)   t²/2 + t + 1/2      (sample before the jump)
//!   t ∈ [0, 1)    t − t²/2 − 1/2      (sample after the jump)
//! ```
//!
//! `t` is the signed distance from the jump in samples. For a step of height
//! `h` the corrected sample is `naive + h · residual(t)`; both halves meet at
//! `±1/2` so the corrected waveform passes through the midpoint of the jump.

/// Residual for a unit step, `t` in samples relative to the jump.
#[inline]
pub fn residual(t: f32) -> f32 {
    if t >= 0.0 {
        t - 0.5 * t * t - 0.5
    } else {
        0.5 * t * t + t + 0.5
    }
}

/// Correction for a unipolar ramp that wraps from 1 to 0. Subtract it.
#[inline]
pub fn saw(phase: f32, inc: f32) -> f32 {
    if phase < inc {
        residual(phase / inc)
    } else if phase > 1.0 - inc {
        residual((phase - 1.0) / inc)
    } else {
        0.0
    }
}

/// Residual for a step at phase `at`, measured around the cycle. Zero more
/// than one sample away. Multiply by the step height and add it.
#[inline]
pub fn step(phase: f32, at: f32, inc: f32) -> f32 {
    let d = phase - at;
    let d = d - (d + 0.5).floor();
    if d.abs() < inc {
        residual(d / inc)
    } else {
        0.0
    }
}

/// Correction for a unipolar pulse that is low below `width`. Subtract it.
#[inline]
pub fn pulse(phase: f32, width: f32, inc: f32) -> f32 {
    if phase < width {
        if phase < inc {
            residual(phase / inc)
        } else if phase > width - inc {
            -residual((phase - width) / inc)
        } else {
            0.0
        }
    } else if phase > 1.0 - inc {
        residual((phase - 1.0) / inc)
    } else if phase < width + inc {
        -residual((phase - width) / inc)
    } else {
        0.0
    }
}
