//! Per-sample waveform functions of a ramp phase.
//!
//! Every shape has the signature [`ShapeFn`]: it takes the phase in `[0, 1)`,
//! the current width and the phase increment, and returns a sample in about
//! `[-1, 1]`. The `BL` parameter selects the band-limited rendition; the
//! oscillator picks one monomorphised function per type when the type
//! changes, so the render loop never branches on the waveform.
//!
//! Three families live here:
//!
//! * virtual analog: naive ramps with PolyBLEP at each jump,
//! * phase distortion: a warped phase read through the cosine table,
//! * electronic: compositions of the phase-shaping primitives below.

use super::polyblep;
use crate::dsp::tables;

pub type ShapeFn = fn(phase: f32, width: f32, inc: f32) -> f32;

// Phase-shaping primitives. Inputs and outputs are unipolar unless noted.

/// Unipolar to bipolar.
#[inline]
pub fn gb(x: f32) -> f32 {
    2.0 * x - 1.0
}

#[inline]
fn mod1(x: f32) -> f32 {
    x - x.floor()
}

/// Scaled and offset ramp, wrapped: `mod1(a1·x + a0)`.
#[inline]
pub fn gramp(x: f32, a1: f32, a0: f32) -> f32 {
    mod1(a1 * x + a0)
}

/// Symmetric triangle that starts and ends at 1.
#[inline]
pub fn gtri(x: f32) -> f32 {
    gb(x).abs()
}

/// Symmetric triangle that starts and ends at 0.
#[inline]
pub fn stri(x: f32) -> f32 {
    if x < 0.5 {
        2.0 * x
    } else {
        2.0 - 2.0 * x
    }
}

/// Triangle peaking at `w`.
#[inline]
pub fn vtri(x: f32, w: f32) -> f32 {
    if x < w {
        x / w
    } else {
        1.0 - (x - w) / (1.0 - w)
    }
}

#[inline]
pub fn gpulse(x: f32, w: f32) -> f32 {
    if x < w {
        0.0
    } else {
        1.0
    }
}

/// Ramp that restarts at `w`.
#[inline]
pub fn gvslope(x: f32, w: f32) -> f32 {
    if x < w {
        x
    } else {
        (x - w) / (1.0 - w)
    }
}

/// Bipolar ramp from `-2w` to `2w` that plateaus after `w`.
#[inline]
pub fn svtri(x: f32, w: f32) -> f32 {
    gb(x) - gb((x - w).abs())
}

/// Two-segment linear warp with its knee at `(w, 0.5)`.
#[inline]
pub fn warp(x: f32, w: f32) -> f32 {
    if x < w {
        0.5 * x / w
    } else {
        0.5 + 0.5 * (x - w) / (1.0 - w)
    }
}

const MIN_WIDTH: f32 = 1e-4;

/// Keep a width inside `(0, 1)`. Band-limited shapes also keep every steep
/// segment at least two samples long.
#[inline]
fn clamp_width<const BL: bool>(w: f32, inc: f32) -> f32 {
    let margin = if BL {
        (2.0 * inc).clamp(MIN_WIDTH, 0.5)
    } else {
        MIN_WIDTH
    };
    w.clamp(margin, 1.0 - margin)
}

// Virtual analog

pub fn va_saw<const BL: bool>(p: f32, _w: f32, inc: f32) -> f32 {
    if BL {
        gb(p - polyblep::saw(p, inc))
    } else {
        gb(p)
    }
}

/// Crossfade from a triangle (width 0) to a saw (width 1).
pub fn va_tri_saw<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = w.clamp(0.0, 1.0);
    (1.0 - w) * gb(stri(p)) + w * va_saw::<BL>(p, w, inc)
}

pub fn va_pulse<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = w.clamp(0.0, 1.0);
    if BL {
        gb(gpulse(p, w) - polyblep::pulse(p, w, inc))
    } else {
        gb(gpulse(p, w))
    }
}

// Phase distortion

pub fn pd_saw<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    -tables::cos(warp(p, clamp_width::<BL>(w, inc)))
}

pub fn pd_square<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = clamp_width::<BL>(w, inc);
    let (half, local) = if p < 0.5 { (0.0, 2.0 * p) } else { (0.5, 2.0 * p - 1.0) };
    tables::cos(half + 0.5 * (local / w).min(1.0))
}

pub fn pd_pulse<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = clamp_width::<BL>(w, inc);
    tables::cos((p / w).min(1.0))
}

pub fn pd_double_sine<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    tables::cos(2.0 * warp(p, clamp_width::<BL>(w, inc)))
}

pub fn pd_saw_pulse<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = clamp_width::<BL>(w, inc);
    let y = if p < 0.5 {
        0.5 * warp(2.0 * p, w)
    } else {
        0.5 + 0.5 * ((2.0 * p - 1.0) / w).min(1.0)
    };
    tables::cos(y)
}

/// Resonance multiplier: 1 to 16 with width, capped below Nyquist when band-limited.
#[inline]
fn resonance<const BL: bool>(w: f32, inc: f32) -> f32 {
    let m = 1.0 + 15.0 * w.clamp(0.0, 1.0);
    if BL {
        m.min((0.45 / inc).max(1.0))
    } else {
        m
    }
}

/// A resonant cosine under a window that is zero wherever the cycle wraps.
#[inline]
fn windowed(p: f32, window: f32, m: f32) -> f32 {
    1.0 - window * (1.0 - tables::cos(m * p))
}

/// Falling-saw window.
pub fn pd_res1<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    windowed(p, 1.0 - p, resonance::<BL>(w, inc))
}

/// Triangle window.
pub fn pd_res2<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    windowed(p, stri(p), resonance::<BL>(w, inc))
}

/// Trapezoid window.
pub fn pd_res3<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    windowed(p, (2.0 - 2.0 * p).min(1.0), resonance::<BL>(w, inc))
}

pub fn pd_half_sine<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    gb(tables::sin(0.5 * warp(p, clamp_width::<BL>(w, inc))))
}

// Electronic

pub fn el_saw<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    va_saw::<BL>(p, w, inc)
}

/// Two saws, the second offset by the width.
pub fn el_double_saw<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let q = gramp(p, 1.0, w);
    0.5 * (va_saw::<BL>(p, w, inc) + va_saw::<BL>(q, w, inc))
}

pub fn el_tri<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    gb(vtri(p, clamp_width::<BL>(w, inc)))
}

pub fn el_pulse<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    va_pulse::<BL>(p, w, inc)
}

pub fn el_pulse_saw<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = clamp_width::<BL>(w, inc);
    svtri(p, w) / (2.0 * w)
}

pub fn el_slope<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    gb(gvslope(p, clamp_width::<BL>(w, inc)))
}

/// Saw whose polarity flips at the width. The only jump sits at the width
/// and has height `2 - 4w`; at `w = 0` or `1` it lands on the wrap.
pub fn el_alpha1<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let w = w.clamp(0.0, 1.0);
    let y = -gb(p) * gb(gpulse(p, w));
    if BL {
        y + (2.0 - 4.0 * w) * polyblep::step(p, w, inc)
    } else {
        y
    }
}

/// Saw plus an octave-up triangle offset by the width. The triangle is
/// continuous, so only the saw wrap needs rounding.
pub fn el_alpha2<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    0.5 * (va_saw::<BL>(p, w, inc) + gb(stri(gramp(p, 2.0, w))))
}

/// Cubic curve over a slope that restarts at the width.
pub fn el_exp<const BL: bool>(p: f32, w: f32, inc: f32) -> f32 {
    let y = gvslope(p, clamp_width::<BL>(w, inc));
    gb(y * y * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::wrap;

    const SHAPES: [(&str, ShapeFn); 21] = [
        ("va_saw", va_saw::<true>),
        ("va_tri_saw", va_tri_saw::<true>),
        ("va_pulse", va_pulse::<true>),
        ("pd_saw", pd_saw::<true>),
        ("pd_square", pd_square::<true>),
        ("pd_pulse", pd_pulse::<true>),
        ("pd_double_sine", pd_double_sine::<true>),
        ("pd_saw_pulse", pd_saw_pulse::<true>),
        ("pd_res1", pd_res1::<true>),
        ("pd_res2", pd_res2::<true>),
        ("pd_res3", pd_res3::<true>),
        ("pd_half_sine", pd_half_sine::<true>),
        ("el_saw", el_saw::<true>),
        ("el_double_saw", el_double_saw::<true>),
        ("el_tri", el_tri::<true>),
        ("el_pulse", el_pulse::<true>),
        ("el_pulse_saw", el_pulse_saw::<true>),
        ("el_slope", el_slope::<true>),
        ("el_alpha1", el_alpha1::<true>),
        ("el_alpha2", el_alpha2::<true>),
        ("el_exp", el_exp::<true>),
    ];

    #[test]
    fn primitives() {
        assert_eq!(gb(0.0), -1.0);
        assert_eq!(gb(1.0), 1.0);
        assert_eq!(gramp(0.75, 2.0, 0.0), 0.5);
        assert_eq!(gtri(0.5), 0.0);
        assert_eq!(stri(0.5), 1.0);
        assert_eq!(gpulse(0.2, 0.5), 0.0);
        assert_eq!(gvslope(0.75, 0.5), 0.5);
        assert_eq!(svtri(0.25, 0.5), 0.0);
        assert_eq!(warp(0.25, 0.25), 0.5);
    }

    #[test]
    fn shapes_stay_in_range() {
        let inc = 440.0 / 44_100.0;
        for (name, shape) in SHAPES {
            for w in [0.0, 0.1, 0.5, 0.9, 1.0] {
                for i in 0..1000 {
                    let p = i as f32 / 1000.0;
                    let y = shape(p, w, inc);
                    assert!(y.is_finite() && y.abs() <= 1.001, "{name} p={p} w={w}: {y}");
                }
            }
        }
    }

    #[test]
    fn phase_distortion_is_continuous_at_wrap() {
        let inc = 0.001;
        let continuous: [(&str, ShapeFn); 9] = [
            ("pd_saw", pd_saw::<true>),
            ("pd_square", pd_square::<true>),
            ("pd_pulse", pd_pulse::<true>),
            ("pd_double_sine", pd_double_sine::<true>),
            ("pd_saw_pulse", pd_saw_pulse::<true>),
            ("pd_res1", pd_res1::<true>),
            ("pd_res2", pd_res2::<true>),
            ("pd_res3", pd_res3::<true>),
            ("pd_half_sine", pd_half_sine::<true>),
        ];
        for (name, shape) in continuous {
            for w in [0.2, 0.5, 0.8] {
                let end = shape(1.0 - 1e-6, w, inc);
                let start = shape(0.0, w, inc);
                assert!((end - start).abs() < 1e-2, "{name} w={w}: {end} vs {start}");
            }
        }
    }

    /// Distance between two phases around the cycle.
    fn cycle_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).abs();
        d.min(1.0 - d)
    }

    #[test]
    fn electronic_jumps_are_rounded_only_near_the_jump() {
        let inc = 5000.0 / 44_100.0;
        let w = 0.3;
        let jumpy: [(&str, ShapeFn, ShapeFn, &[f32]); 5] = [
            ("el_saw", el_saw::<true>, el_saw::<false>, &[0.0]),
            ("el_double_saw", el_double_saw::<true>, el_double_saw::<false>, &[0.0, 1.0 - w]),
            ("el_pulse", el_pulse::<true>, el_pulse::<false>, &[0.0, w]),
            ("el_alpha1", el_alpha1::<true>, el_alpha1::<false>, &[w]),
            ("el_alpha2", el_alpha2::<true>, el_alpha2::<false>, &[0.0]),
        ];
        for (name, bl, naive, jumps) in jumpy {
            for &at in jumps {
                for offset in [-0.5 * inc, -0.1 * inc, 0.1 * inc, 0.5 * inc] {
                    let p = wrap(at + offset);
                    let diff = (bl(p, w, inc) - naive(p, w, inc)).abs();
                    assert!(diff > 1e-3, "{name} near {at}: p={p} diff={diff}");
                }
            }
            let mut untouched = 0;
            for i in 0..1000 {
                let p = i as f32 / 1000.0;
                if jumps.iter().all(|&at| cycle_distance(p, at) > inc + 1e-4) {
                    assert_eq!(bl(p, w, inc), naive(p, w, inc), "{name} p={p}");
                    untouched += 1;
                }
            }
            assert!(untouched > 0, "{name}");
        }
    }

    #[test]
    fn alpha1_at_zero_width_rounds_the_wrap() {
        let inc = 0.01;
        // The flip lands on the wrap: a jump from -1 up to 1.
        let before = el_alpha1::<true>(1.0 - 0.5 * inc, 0.0, inc);
        let after = el_alpha1::<true>(0.5 * inc, 0.0, inc);
        assert!(before > -0.9 && after < 0.9, "{before} {after}");
    }

    #[test]
    fn pd_saw_at_half_width_is_cosine() {
        // At w = 0.5 the warp is the identity.
        for i in 0..100 {
            let p = i as f32 / 100.0;
            let expected = -(std::f32::consts::TAU * p).cos();
            assert!((pd_saw::<false>(p, 0.5, 0.01) - expected).abs() < 1e-4);
        }
    }
}
