use super::{samples_for, Effect};
use crate::dsp::delay::DelayH;
use crate::dsp::tables;

/*
Chorus Effect
=============

Chorus thickens a sound by adding a slightly delayed, pitch-modulated copy.
As the delay time moves, the copy drifts sharp and flat, which mimics
several players on the same part.

Each channel has its own Hermite-interpolated delay line, so the swept
read position stays smooth and keeps its highs. One LFO drives both, in opposite
polarity, so the two sides drift apart and the image widens:

  left delay  = base + depth · sin(2π·phase)
  right delay = base − depth · sin(2π·phase)

Feedback sends part of each line's output back into its own input for a
more flanger-like sound.

Parameters
----------

Base delay (1 - 30 ms):   the centre delay time. Too short: comb filtering.
Depth (0 - base ms):      how far the delay swings either side.
Rate (Hz):                LFO speed. Classic chorus: 0.5 - 1.5 Hz.
Feedback (0 - 1):         scaled by 0.95 so the loop always decays.
Wet (0 - 1):              amount of the delayed copy added to the dry signal.
*/

const MAX_DELAY_SECONDS: f32 = 0.065;
const FEEDBACK_LIMIT: f32 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct Chorus {
    sample_rate: f32,
    delay_ms: f32,
    depth_ms: f32,
    rate: f32,
    feedback: f32,
    wet: f32,

    left: DelayH,
    right: DelayH,
    lfo_phase: f32,
}

impl Chorus {
    pub fn new(sample_rate: f32) -> Self {
        let capacity = samples_for(MAX_DELAY_SECONDS, sample_rate) + 2;
        Self {
            sample_rate,
            delay_ms: 20.0,
            depth_ms: 2.0,
            rate: 0.8,
            feedback: 0.0,
            wet: 0.5,
            left: DelayH::with_capacity(capacity),
            right: DelayH::with_capacity(capacity),
            lfo_phase: 0.0,
        }
    }

    pub fn set_coefficients(&mut self, delay_ms: f32, depth_ms: f32, rate: f32, feedback: f32, wet: f32) {
        self.delay_ms = delay_ms.clamp(1.0, 30.0);
        self.depth_ms = depth_ms.clamp(0.0, self.delay_ms);
        self.rate = rate.max(0.0);
        self.feedback = feedback.clamp(0.0, 1.0) * FEEDBACK_LIMIT;
        self.wet = wet.clamp(0.0, 1.0);
    }

    #[inline]
    fn tap(line: &mut DelayH, input: f32, delay: f32, feedback: f32) -> f32 {
        line.set_delay(delay);
        let delayed = line.next_out();
        line.write(input + feedback * delayed);
        delayed
    }
}

impl Effect for Chorus {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("chorus", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
        let capacity = samples_for(MAX_DELAY_SECONDS, sample_rate) + 2;
        self.left.set_max(capacity);
        self.right.set_max(capacity);
        self.reset();
    }

    fn reset(&mut self) {
        // Delays are set per sample; park them where a fresh line starts.
        for line in [&mut self.left, &mut self.right] {
            line.clear();
            line.set_delay(DelayH::MIN_DELAY);
        }
        self.lfo_phase = 0.0;
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let base = self.delay_ms * self.sample_rate / 1000.0;
        let depth = self.depth_ms * self.sample_rate / 1000.0;
        let phase_inc = self.rate / self.sample_rate;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let lfo = depth * tables::sin(self.lfo_phase);
            let wet_l = Self::tap(&mut self.left, *l, base + lfo, self.feedback);
            let wet_r = Self::tap(&mut self.right, *r, base - lfo, self.feedback);
            *l += self.wet * wet_l;
            *r += self.wet * wet_r;

            self.lfo_phase += phase_inc;
            self.lfo_phase -= self.lfo_phase.floor();
        }
    }
}
