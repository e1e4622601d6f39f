use super::Effect;
use crate::dsp::filter::{Filter, PoleZero};
use crate::dsp::tables;

/*
Phaser
======

A chain of first-order allpass stages shifts the phase of the signal by an
amount that depends on frequency. Added back to the dry signal, the shifted
copy cancels at a few frequencies and reinforces at others, giving moving
notches as an LFO sweeps the allpass corner.

  in ──(+)──→ [AP] → [AP] → … → [AP] ──┬──→ wet
        ↑                               │
        └──────────── feedback ─────────┘

Every stage on both channels shares one coefficient per sample:

  a = (1 − d) / (1 + d),   d = 2·f / sr

with f swept between 440 Hz and 440 · (1 + 9·depth) Hz.
*/

pub const STAGES: usize = 8;
const MIN_HZ: f32 = 440.0;
const FEEDBACK_LIMIT: f32 = 0.95;

#[derive(Debug, Clone, PartialEq)]
struct Chain {
    stages: [PoleZero; STAGES],
    last: f32,
}

impl Chain {
    fn new() -> Self {
        Self {
            stages: std::array::from_fn(|_| PoleZero::new()),
            last: 0.0,
        }
    }

    #[inline]
    fn tick(&mut self, input: f32, coefficient: f32, feedback: f32) -> f32 {
        let mut y = input + feedback * self.last;
        for stage in &mut self.stages {
            stage.set_allpass(-coefficient);
            y = stage.tick(y);
        }
        self.last = y;
        y
    }

    fn clear(&mut self) {
        self.stages = std::array::from_fn(|_| PoleZero::new());
        self.last = 0.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phaser {
    sample_rate: f32,
    rate: f32,
    depth: f32,
    feedback: f32,
    wet: f32,

    left: Chain,
    right: Chain,
    lfo_phase: f32,
}

impl Phaser {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            rate: 0.5,
            depth: 0.5,
            feedback: 0.0,
            wet: 0.5,
            left: Chain::new(),
            right: Chain::new(),
            lfo_phase: 0.0,
        }
    }

    /// `rate` in Hz; `depth`, `feedback` and `wet` in `[0, 1]`.
    pub fn set_coefficients(&mut self, rate: f32, depth: f32, feedback: f32, wet: f32) {
        self.rate = rate.max(0.0);
        self.depth = depth.clamp(0.0, 1.0);
        self.feedback = feedback.clamp(0.0, 1.0) * FEEDBACK_LIMIT;
        self.wet = wet.clamp(0.0, 1.0);
    }

    /// Allpass coefficient at LFO phase `phase`.
    fn coefficient(&self, phase: f32) -> f32 {
        let d_min = 2.0 * MIN_HZ / self.sample_rate;
        let d_max = d_min * (1.0 + 9.0 * self.depth);
        let d = d_min + (d_max - d_min) * 0.5 * (1.0 + tables::sin(phase));
        (1.0 - d) / (1.0 + d)
    }
}

impl Effect for Phaser {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("phaser", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
        self.reset();
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        self.lfo_phase = 0.0;
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let phase_inc = self.rate / self.sample_rate;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let a = self.coefficient(self.lfo_phase);
            self.lfo_phase += phase_inc;
            self.lfo_phase -= self.lfo_phase.floor();

            let out_l = self.left.tick(*l, a, self.feedback);
            let out_r = self.right.tick(*r, a, self.feedback);
            *l += self.wet * out_l;
            *r += self.wet * out_r;
        }
    }
}
