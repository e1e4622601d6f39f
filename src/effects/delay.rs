use super::{samples_for, Effect};
use crate::dsp::delay::Delay;
use crate::dsp::filter::{Filter, OnePole, PoleZero};

/*
Stereo Delay
============

Two echo lines with independent, tempo-synced times. Each repeat passes
through a highpass then a lowpass before being fed back, so the echoes get
thinner and darker as they fade.

  l ──(+)──→ [delay L] ──┬──────────────────→ wet L
       ↑                 └→ [HP] → [LP] ─┐
       └──── (1 − pp)·fb ←───────────────┤
                                          ╳  ping-pong: pp·fb crosses over
       ┌──── (1 − pp)·fb ←───────────────┤
       ↓                 ┌→ [HP] → [LP] ─┘
  r ──(+)──→ [delay R] ──┴──────────────────→ wet R

Times are given in beats and converted with the tempo:

  seconds = division · 60 / bpm

With bpm = 0 the divisions are taken as seconds directly.
*/

const MAX_DELAY_SECONDS: f32 = 4.0;
const FEEDBACK_LIMIT: f32 = 0.98;

#[derive(Debug, Clone, PartialEq)]
struct Line {
    delay: Delay,
    highpass: PoleZero,
    lowpass: OnePole,
}

impl Line {
    fn new(capacity: usize) -> Self {
        Self {
            delay: Delay::with_capacity(capacity),
            highpass: PoleZero::new(),
            lowpass: OnePole::new(0.0),
        }
    }

    fn clear(&mut self) {
        self.delay.clear();
        self.highpass.clear();
        self.lowpass.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StereoDelay {
    sample_rate: f32,
    bpm: f32,
    divisions: [f32; 2],
    feedback: f32,
    wet: f32,
    ping_pong: f32,
    highpass_hz: f32,
    lowpass_hz: f32,

    left: Line,
    right: Line,
}

impl StereoDelay {
    pub fn new(sample_rate: f32) -> Self {
        let capacity = samples_for(MAX_DELAY_SECONDS, sample_rate) + 1;
        let mut delay = Self {
            sample_rate,
            bpm: 120.0,
            divisions: [0.75, 0.5],
            feedback: 0.3,
            wet: 0.0,
            ping_pong: 0.0,
            highpass_hz: 40.0,
            lowpass_hz: 8_000.0,
            left: Line::new(capacity),
            right: Line::new(capacity),
        };
        delay.update();
        delay
    }

    /// `division_*` in beats (seconds when `bpm` is 0); `feedback`, `wet`
    /// and `ping_pong` in `[0, 1]`; filter corners in Hz.
    #[allow(clippy::too_many_arguments)]
    pub fn set_coefficients(
        &mut self,
        bpm: f32,
        division_l: f32,
        division_r: f32,
        feedback: f32,
        wet: f32,
        ping_pong: f32,
        highpass_hz: f32,
        lowpass_hz: f32,
    ) {
        self.bpm = bpm.max(0.0);
        self.divisions = [division_l.max(0.0), division_r.max(0.0)];
        self.feedback = feedback.clamp(0.0, 1.0) * FEEDBACK_LIMIT;
        self.wet = wet.clamp(0.0, 1.0);
        self.ping_pong = ping_pong.clamp(0.0, 1.0);
        self.highpass_hz = highpass_hz;
        self.lowpass_hz = lowpass_hz;
        self.update();
    }

    /// Delay time in seconds for one division.
    pub fn seconds(&self, division: f32) -> f32 {
        if self.bpm > 0.0 {
            division * 60.0 / self.bpm
        } else {
            division
        }
    }

    /// Current delay in samples, `[left, right]`.
    pub fn delays(&self) -> [usize; 2] {
        [self.left.delay.delay(), self.right.delay.delay()]
    }

    fn update(&mut self) {
        let [division_l, division_r] = self.divisions;
        let samples_l = (self.seconds(division_l) * self.sample_rate).round().max(1.0) as usize;
        let samples_r = (self.seconds(division_r) * self.sample_rate).round().max(1.0) as usize;
        let (sr, hp, lp) = (self.sample_rate, self.highpass_hz, self.lowpass_hz);
        for (line, samples) in [(&mut self.left, samples_l), (&mut self.right, samples_r)] {
            line.delay.set_delay(samples);
            line.highpass.set_highpass(hp, sr);
            line.lowpass.set_lowpass(lp, sr);
        }
    }
}

impl Effect for StereoDelay {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("stereo delay", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
        let capacity = samples_for(MAX_DELAY_SECONDS, sample_rate) + 1;
        self.left.delay.set_max(capacity);
        self.right.delay.set_max(capacity);
        self.update();
        self.reset();
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let straight = self.feedback * (1.0 - self.ping_pong);
        let cross = self.feedback * self.ping_pong;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let out_l = self.left.delay.next_out();
            let out_r = self.right.delay.next_out();
            let fb_l = self.left.lowpass.tick(self.left.highpass.tick(out_l));
            let fb_r = self.right.lowpass.tick(self.right.highpass.tick(out_r));

            self.left.delay.process(*l + straight * fb_l + cross * fb_r);
            self.right.delay.process(*r + straight * fb_r + cross * fb_l);
            *l += self.wet * out_l;
            *r += self.wet * out_r;
        }
    }
}
