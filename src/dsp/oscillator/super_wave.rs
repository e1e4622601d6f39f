//! Seven detuned copies of one waveform, summed.
//!
//! Voice `k` runs at `inc · SEMITONE^(SPREAD[k] · width)`, so the width sets
//! the detune in semitones, up to one semitone either side at width 1. The
//! centre voice (index 3) never detunes and drives the sync output.

use super::shapes::ShapeFn;

pub const VOICES: usize = 7;
pub const CENTER: usize = VOICES / 2;

const SEMITONE: f32 = 1.059_46;
const SPREAD: [f32; VOICES] = [-1.0, -2.0 / 3.0, -1.0 / 3.0, 0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
/// Golden-ratio offsets keep the voices from starting in phase.
const START_OFFSET: f32 = 0.618_034;

#[derive(Debug, Clone, PartialEq)]
pub struct SuperWave {
    phases: [f32; VOICES],
    start: f32,
}

impl SuperWave {
    pub fn new(start: f32) -> Self {
        let mut wave = Self {
            phases: [0.0; VOICES],
            start,
        };
        wave.reset();
        wave
    }

    pub fn set_start(&mut self, start: f32) {
        self.start = start;
    }

    pub fn reset(&mut self) {
        for (k, phase) in self.phases.iter_mut().enumerate() {
            let p = self.start + k as f32 * START_OFFSET;
            *phase = p - p.floor();
        }
    }

    #[inline]
    pub fn increment(inc: f32, width: f32, voice: usize) -> f32 {
        inc * SEMITONE.powf(SPREAD[voice] * width)
    }

    /// Phase of the undetuned voice.
    pub fn center_phase(&self) -> f32 {
        self.phases[CENTER]
    }

    /// Advance every voice and return the normalised sum. `offset` is the
    /// phase-modulation term added before the shape lookup.
    #[inline]
    pub fn tick(&mut self, shape: ShapeFn, inc: f32, width: f32, offset: f32) -> f32 {
        let mut sum = 0.0;
        for (k, phase) in self.phases.iter_mut().enumerate() {
            let voice_inc = Self::increment(inc, width, k);
            *phase += voice_inc;
            *phase -= phase.floor();
            sum += shape(super::wrap(*phase + offset), 0.5, voice_inc);
        }
        sum / VOICES as f32
    }

    /// Restart every voice `fraction` samples after a master reset.
    pub fn hard_sync(&mut self, fraction: f32, inc: f32, width: f32) {
        for (k, phase) in self.phases.iter_mut().enumerate() {
            *phase = super::wrap(fraction * Self::increment(inc, width, k));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::shapes;
    use super::*;

    #[test]
    fn voices_start_spread_out() {
        let wave = SuperWave::new(0.0);
        let mut phases = wave.phases;
        phases.sort_by(f32::total_cmp);
        assert!(phases.windows(2).all(|w| w[1] - w[0] > 0.05), "{phases:?}");
        assert_eq!(wave.center_phase(), (3.0 * START_OFFSET).fract());
    }

    #[test]
    fn zero_width_voices_stay_locked() {
        let mut wave = SuperWave::new(0.0);
        wave.hard_sync(0.0, 0.01, 0.0);
        for _ in 0..1000 {
            let y = wave.tick(shapes::va_saw::<false>, 0.01, 0.0, 0.0);
            let single = shapes::va_saw::<false>(wave.center_phase(), 0.5, 0.01);
            assert!((y - single).abs() < 1e-5);
        }
    }

    #[test]
    fn detune_is_symmetric() {
        let up = SuperWave::increment(0.01, 1.0, VOICES - 1);
        let down = SuperWave::increment(0.01, 1.0, 0);
        assert!((up / 0.01 - SEMITONE).abs() < 1e-5);
        assert!((0.01 / down - SEMITONE).abs() < 1e-5);
        assert_eq!(SuperWave::increment(0.01, 1.0, CENTER), 0.01);
    }

    #[test]
    fn output_is_bounded() {
        let mut wave = SuperWave::new(0.25);
        for _ in 0..10_000 {
            let y = wave.tick(shapes::va_pulse::<true>, 0.02, 0.8, 0.0);
            assert!(y.abs() <= 1.0 + 1e-4);
        }
    }
}
