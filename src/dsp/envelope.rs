#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
AHDSR Envelope
==============

A pre-delay/attack/hold/decay/sustain/release envelope with one curve
control shared by every stage.

Vocabulary
----------

  stage       Which segment the envelope is in. A state machine governs
              transitions; see below.

  duration    Length of a timed stage in samples. Fractional lengths are
              fine. A zero-length stage is skipped.

  progress    How far through the current stage we are: elapsed / duration,
              from 0 to 1.

  offset      The value when the stage began. Every stage starts from where
              the previous one left off, so the output never jumps.

  scale       target − offset. The value is offset + scale · shape(progress).

  gate        on() raises it, off() lowers it.


The Shape
---------

  shape(x) = x / (x + a·(x − 1)),   a = −(1 − c) / c

  c = 0.5   linear
  c < 0.5   slow start, fast finish (exponential-like)
  c > 0.5   fast start, slow finish (logarithmic-like)

  Level
    1.0 ┐    ╱‾‾‾╲
        │   ╱      ╲
    S   │  ╱        ‾‾‾‾‾‾‾‾‾‾╲
        │ ╱                    ╲
    0.0 └╱──────────────────────╲──→ Time
     Pre  Attack Hold Decay Sustain Release

shape(0) = 0 and shape(1) = 1 for every c, which is what keeps stage
boundaries continuous.


The State Machine
-----------------

             on()                            off()
    Idle ──────────→ Pre ─→ Attack ─→ Hold ─→ Decay ─→ Sustain ─────→ Release ─→ Idle
                                ↑                                         │
                                └──────── on() mid-release ───────────────┘

  on()   enters Pre (or Attack with no pre-delay) from the current value.
         The attack keeps its slope: starting from v, it lasts
         attack · (1 − v) samples.
  off()  enters Release from the current value, from any stage.

In retrigger mode the envelope cycles while the gate is held: Decay runs
straight into Release, and the end of Release starts a new Attack.


Block-Rate Ticking
------------------

tick_block(n) advances n samples at once. Overshoot past the end of a stage
is carried into the next one, so tick_block(n) lands on the same value and
stage as n calls to tick().
*/

/// Stage of the envelope state machine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvelopeStage {
    Pre,
    Attack,
    Hold,
    Decay,
    Sustain,
    Release,
    #[default]
    Idle,
}

impl EnvelopeStage {
    /// Sustain and Idle last until the gate changes.
    fn is_timed(self) -> bool {
        !matches!(self, EnvelopeStage::Sustain | EnvelopeStage::Idle)
    }
}

const PEAK: f32 = 1.0;
const LINEAR: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    // Durations in samples
    pre: f32,
    attack: f32,
    hold: f32,
    decay: f32,
    release: f32,
    sustain: f32,
    curve: f32,
    curve_a: f32,
    retrigger: bool,

    stage: EnvelopeStage,
    gate: bool,
    value: f32,
    offset: f32,
    scale: f32,
    elapsed: f64,
    duration: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    /// Every stage zero-length, full sustain, linear curve.
    pub fn new() -> Self {
        Self {
            pre: 0.0,
            attack: 0.0,
            hold: 0.0,
            decay: 0.0,
            release: 0.0,
            sustain: 1.0,
            curve: LINEAR,
            curve_a: -1.0,
            retrigger: false,

            stage: EnvelopeStage::Idle,
            gate: false,
            value: 0.0,
            offset: 0.0,
            scale: 0.0,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    /// Durations in samples, sustain level in `[0, 1]`.
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self::new();
        env.set_ahdsr(attack, 0.0, decay, sustain, release);
        env
    }

    /// Durations in samples, sustain level in `[0, 1]`. Takes effect at the
    /// next stage change.
    pub fn set_ahdsr(&mut self, attack: f32, hold: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack.max(0.0);
        self.hold = hold.max(0.0);
        self.decay = decay.max(0.0);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.max(0.0);
    }

    /// Samples between on() and the start of the attack.
    pub fn set_predelay(&mut self, samples: f32) {
        self.pre = samples.max(0.0);
    }

    /// Curve control in `[0, 1]`, 0.5 is linear. Kept inside `[0.01, 0.99]`.
    pub fn set_curve(&mut self, curve: f32) {
        self.curve = curve.clamp(0.01, 0.99);
        self.curve_a = -(1.0 - self.curve) / self.curve;
    }

    pub fn set_retrigger(&mut self, retrigger: bool) {
        self.retrigger = retrigger;
    }

    pub fn on(&mut self) {
        self.gate = true;
        if self.pre > 0.0 {
            self.enter(EnvelopeStage::Pre);
        } else {
            self.enter(EnvelopeStage::Attack);
        }
    }

    pub fn off(&mut self) {
        self.gate = false;
        self.enter(EnvelopeStage::Release);
    }

    /// Advance one sample and return the new value.
    pub fn tick(&mut self) -> f32 {
        self.tick_block(1)
    }

    /// Advance `samples` samples and return the value after the last one.
    pub fn tick_block(&mut self, samples: usize) -> f32 {
        let mut remaining = samples as f64;
        while self.stage.is_timed() {
            let left = self.duration - self.elapsed;
            if remaining < left {
                self.elapsed += remaining;
                break;
            }
            remaining -= left;
            self.finish_stage();
        }
        self.value = self.current();
        self.value
    }

    /// Fill `buffer` with one value per sample.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick();
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Back to idle and silent, keeping every setting.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.gate = false;
        self.value = 0.0;
        self.offset = 0.0;
        self.scale = 0.0;
        self.elapsed = 0.0;
        self.duration = 0.0;
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        if self.curve == LINEAR {
            x
        } else {
            x / (x + self.curve_a * (x - 1.0))
        }
    }

    fn current(&self) -> f32 {
        match self.stage {
            EnvelopeStage::Sustain => self.sustain,
            EnvelopeStage::Idle => 0.0,
            _ => {
                let progress = if self.duration > 0.0 {
                    (self.elapsed / self.duration).min(1.0) as f32
                } else {
                    1.0
                };
                self.offset + self.scale * self.shape(progress)
            }
        }
    }

    fn enter(&mut self, stage: EnvelopeStage) {
        let from = self.current_or_value();
        let (target, duration) = match stage {
            EnvelopeStage::Pre => (from, self.pre),
            EnvelopeStage::Attack => (PEAK, self.attack * (PEAK - from).max(0.0)),
            EnvelopeStage::Hold => (from, self.hold),
            EnvelopeStage::Decay => (self.sustain, self.decay),
            EnvelopeStage::Sustain => (self.sustain, 0.0),
            EnvelopeStage::Release => (0.0, self.release),
            EnvelopeStage::Idle => (0.0, 0.0),
        };
        self.stage = stage;
        self.offset = from;
        self.scale = target - from;
        self.elapsed = 0.0;
        self.duration = duration as f64;
        self.value = from;
    }

    /// Value at the end of the current stage, or the live value when untimed.
    fn current_or_value(&self) -> f32 {
        if self.stage.is_timed() {
            self.current()
        } else {
            self.value
        }
    }

    fn finish_stage(&mut self) {
        // Land exactly on the stage target before moving on.
        self.elapsed = self.duration;
        self.value = self.offset + self.scale;

        let looping = self.retrigger && self.gate && self.cycle_length() > 0.0;
        let next = match self.stage {
            EnvelopeStage::Pre => EnvelopeStage::Attack,
            EnvelopeStage::Attack => EnvelopeStage::Hold,
            EnvelopeStage::Hold => EnvelopeStage::Decay,
            EnvelopeStage::Decay if looping => EnvelopeStage::Release,
            EnvelopeStage::Decay => EnvelopeStage::Sustain,
            EnvelopeStage::Release if looping => EnvelopeStage::Attack,
            EnvelopeStage::Release => EnvelopeStage::Idle,
            EnvelopeStage::Sustain | EnvelopeStage::Idle => self.stage,
        };
        self.enter(next);
    }

    fn cycle_length(&self) -> f32 {
        self.attack + self.hold + self.decay + self.release
    }
}
