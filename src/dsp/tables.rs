//! Precomputed lookup tables for the transcendental functions used per sample.
//!
//! The tables are built once, the first time any of them is touched (or when a
//! host calls [`init`] during setup), and are read-only afterwards. That makes
//! them the only state shared between voices and effects; reading needs no
//! locking.
//!
//! ```text
//!   SIN / COS   one cycle, 8000 steps, input in cycles (wrapped into [0, 1))
//!   TANH        [-5, 5] at 1000 steps per unit, saturates to ±1 outside
//! ```
//!
//! Every table carries one guard entry past its last step so the linear
//! accessor can always read `i + 1`.

use std::f64::consts::TAU;

use once_cell::sync::Lazy;

/// Steps per cycle of the sine and cosine tables.
pub const CYCLE_STEPS: usize = 8000;
/// Half-width of the tanh table domain.
pub const TANH_RANGE: f32 = 5.0;
/// Resolution of the tanh table.
pub const TANH_STEPS_PER_UNIT: usize = 1000;

pub static SIN: Lazy<LookupTable> = Lazy::new(|| LookupTable::periodic(CYCLE_STEPS, |p| (TAU * p).sin()));

pub static COS: Lazy<LookupTable> = Lazy::new(|| LookupTable::periodic(CYCLE_STEPS, |p| (TAU * p).cos()));

pub static TANH: Lazy<LookupTable> = Lazy::new(|| {
    LookupTable::saturating(-TANH_RANGE, TANH_RANGE, TANH_STEPS_PER_UNIT, f64::tanh)
});

/// Force construction of every table.
///
/// Optional: the tables build lazily on first use. Hosts call this during
/// setup so the one-time cost never lands inside an audio callback.
pub fn init() {
    Lazy::force(&SIN);
    Lazy::force(&COS);
    Lazy::force(&TANH);
    log::debug!(
        "lookup tables ready: sin/cos {} steps, tanh ±{} at {} steps/unit",
        CYCLE_STEPS,
        TANH_RANGE,
        TANH_STEPS_PER_UNIT
    );
}

/// `sin(2π·phase)`, phase in cycles.
#[inline]
pub fn sin(phase: f32) -> f32 {
    SIN.linear(phase)
}

/// `cos(2π·phase)`, phase in cycles.
#[inline]
pub fn cos(phase: f32) -> f32 {
    COS.linear(phase)
}

/// Saturating hyperbolic tangent.
#[inline]
pub fn tanh(x: f32) -> f32 {
    TANH.linear(x)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Domain {
    /// Input is in cycles and wraps.
    Periodic,
    /// Input is clamped; values outside `[min, max]` return `below`/`above`.
    Saturating {
        min: f32,
        max: f32,
        below: f32,
        above: f32,
    },
}

/// A function sampled over a fixed, discretised domain.
#[derive(Debug, Clone)]
pub struct LookupTable {
    values: Box<[f32]>,
    steps: usize,
    domain: Domain,
}

impl LookupTable {
    /// One cycle of `f`, where `f` takes a phase in `[0, 1]`.
    pub fn periodic(steps: usize, f: impl Fn(f64) -> f64) -> Self {
        let values = (0..=steps)
            .map(|i| f(i as f64 / steps as f64) as f32)
            .collect();
        Self {
            values,
            steps,
            domain: Domain::Periodic,
        }
    }

    /// `f` sampled over `[min, max]`, saturating to ±1 outside that range.
    pub fn saturating(min: f32, max: f32, steps_per_unit: usize, f: impl Fn(f64) -> f64) -> Self {
        let steps = ((max - min) * steps_per_unit as f32).round() as usize;
        let span = (max - min) as f64;
        let values = (0..=steps)
            .map(|i| f(min as f64 + span * i as f64 / steps as f64) as f32)
            .collect();
        Self {
            values,
            steps,
            domain: Domain::Saturating {
                min,
                max,
                below: -1.0,
                above: 1.0,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Scaled table position for `x`, always inside `[0, steps]`.
    ///
    /// Returns `Err(value)` when a saturating table is read outside its domain.
    #[inline]
    fn position(&self, x: f32) -> Result<f32, f32> {
        match self.domain {
            Domain::Periodic => Ok(x.rem_euclid(1.0) * self.steps as f32),
            Domain::Saturating {
                min,
                max,
                below,
                above,
            } => {
                if x <= min {
                    Err(below)
                } else if x >= max {
                    Err(above)
                } else {
                    Ok((x - min) / (max - min) * self.steps as f32)
                }
            }
        }
    }

    /// Nearest table entry, no interpolation.
    #[inline]
    pub fn fast(&self, x: f32) -> f32 {
        match self.position(x) {
            Ok(pos) => self.values[((pos + 0.5) as usize).min(self.steps)],
            Err(saturated) => saturated,
        }
    }

    /// Linear interpolation between the two entries around `x`.
    #[inline]
    pub fn linear(&self, x: f32) -> f32 {
        match self.position(x) {
            Ok(pos) => {
                let i = (pos as usize).min(self.steps - 1);
                let frac = pos - i as f32;
                self.values[i] + frac * (self.values[i + 1] - self.values[i])
            }
            Err(saturated) => saturated,
        }
    }
}
