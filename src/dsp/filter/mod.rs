//! Recursive filters.
//!
//! ```text
//! | filter            | order | coefficients from            |
//! | ----------------- | ----- | ---------------------------- |
//! | OnePole / OneZero | 1     | pole/zero position, cutoff   |
//! | PoleZero          | 1     | allpass coeff, DC block, HP  |
//! | TwoPole / TwoZero | 2     | caller                       |
//! | BiQuad            | 2     | caller                       |
//! | BiQuadDf2         | 2     | caller, RBJ low/high-pass    |
//! | AmSynthFilter     | 2 / 4 | bilinear, one or two biquads |
//! | DcBlocker         | 1     | sample rate                  |
//! | LadderFilter      | 4     | fitted polynomials in wc     |
//! | HuovilainenFilter | 4     | fitted polynomials in fc     |
//! | StateVariable     | 2     | Chamberlin, 2x oversampled   |
//! | TrapezoidalSvf    | 2     | Simper, trapezoidal          |
//! | CombFilter        | -     | delay = sr / fc              |
//! ```
//!
//! Multi-mode filters compute every internal stage each sample and mix the
//! requested response from a small per-type weight vector, chosen once in
//! `set_type`.

pub mod amsynth;
pub mod basic;
pub mod comb;
pub mod ladder;
pub mod svf;

pub use amsynth::{AmSynthFilter, AmSynthType};
pub use basic::{BiQuad, BiQuadDf2, DcBlocker, OnePole, OneZero, PoleZero, TwoPole, TwoZero};
pub use comb::CombFilter;
pub use ladder::{HuovilainenFilter, LadderFilter, LadderType};
pub use svf::{StateVariableFilter, SvfOutputs, SvfType, TrapezoidalSvf};

/// Per-sample and per-block processing shared by every filter.
pub trait Filter {
    /// Filter one sample.
    fn tick(&mut self, input: f32) -> f32;

    /// Return to the silent state of a fresh instance. Coefficients are kept.
    fn clear(&mut self);

    /// Filter `input` into `output`. Processes `min(input.len(), output.len())` samples.
    fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.tick(x);
        }
    }

    /// Filter `buffer` in place.
    fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(*sample);
        }
    }
}

#[inline]
pub(crate) fn mix<const N: usize>(weights: &[f32; N], taps: &[f32; N]) -> f32 {
    weights.iter().zip(taps).map(|(w, t)| w * t).sum()
}
