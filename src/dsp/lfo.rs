//! Low Frequency Oscillator (LFO).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{tables, NoiseSource};

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio frequencies, used to move
other parameters rather than to be heard. No band-limiting is needed: at
these rates aliasing is not a concern, and the hard edges of the saw and
square shapes are part of their character.

Vocabulary
----------

  control-rate    Frequencies below human hearing: ~0.01 Hz to ~20 Hz.

  bipolar         Output swings -1.0 to +1.0. Every shape here is bipolar.
                  Convert: unipolar = (bipolar + 1.0) / 2.0

  width           Where the square switches from low to high, as a fraction
                  of the cycle. 0.5 is a symmetric square.

  block rate      A host may tick the LFO once per block with tick_block(n)
                  instead of once per sample. The phase advances n samples
                  at once and the shape is read at the end.


Shapes
------

SINE        read from the shared sine table, starts at 0 going up
TRIANGLE    -1 → +1 → -1, starts at the bottom
SAW UP      ╱╱╱╱   gradual rise, snap down
SAW DOWN    ╲╲╲╲   gradual fall, snap up
SQUARE      -1 below the width, +1 above it
SAMPLE & HOLD
            A new uniform random value each time the phase wraps, held for
            the whole cycle. The random source is seeded, so reset()
            replays the same sequence.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LfoWaveform {
    #[default]
    Sine,
    Triangle,
    SawUp,
    SawDown,
    Square,
    SampleHold,
}

impl LfoWaveform {
    pub const ALL: [LfoWaveform; 6] = [
        LfoWaveform::Sine,
        LfoWaveform::Triangle,
        LfoWaveform::SawUp,
        LfoWaveform::SawDown,
        LfoWaveform::Square,
        LfoWaveform::SampleHold,
    ];

    /// Map a host-side integer selector; out-of-range values fall back to `Sine`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_else(|| {
            log::debug!("lfo waveform {index} out of range, using {:?}", Self::default());
            Self::default()
        })
    }
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lfo {
    waveform: LfoWaveform,
    sample_rate: f32,
    frequency: f32,
    width: f32,
    phase: f32,
    held: f32,
    rng: NoiseSource,
}

impl Lfo {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        let mut lfo = Self {
            waveform: LfoWaveform::default(),
            sample_rate,
            frequency: 1.0,
            width: 0.5,
            phase: 0.0,
            held: 0.0,
            rng: NoiseSource::new(seed),
        };
        lfo.reset();
        lfo
    }

    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("lfo", sample_rate) {
            return;
        }
        self.sample_rate = sample_rate;
    }

    /// Negative frequencies are treated as zero.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    /// Square-wave switch point, clamped to `[0, 1]`.
    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(0.0, 1.0);
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Restart the cycle and the sample-and-hold sequence.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.rng.reset();
        self.held = self.rng.bipolar();
    }

    #[inline]
    fn increment(&self) -> f32 {
        self.frequency / self.sample_rate
    }

    /// Advance one sample.
    pub fn tick(&mut self) -> f32 {
        self.tick_block(1)
    }

    /// Advance `samples` samples and return the value at the end.
    pub fn tick_block(&mut self, samples: usize) -> f32 {
        let next = self.phase + samples as f32 * self.increment();
        let wrapped = next >= 1.0;
        self.phase = next - next.floor();
        if wrapped && self.waveform == LfoWaveform::SampleHold {
            self.held = self.rng.bipolar();
        }
        self.value()
    }

    /// Value at the current phase without advancing.
    pub fn value(&self) -> f32 {
        let p = self.phase;
        match self.waveform {
            LfoWaveform::Sine => tables::sin(p),
            LfoWaveform::Triangle => 2.0 * if p < 0.5 { 2.0 * p } else { 2.0 - 2.0 * p } - 1.0,
            LfoWaveform::SawUp => 2.0 * p - 1.0,
            LfoWaveform::SawDown => 1.0 - 2.0 * p,
            LfoWaveform::Square => {
                if p < self.width {
                    -1.0
                } else {
                    1.0
                }
            }
            LfoWaveform::SampleHold => self.held,
        }
    }

    /// Same as [`tick`](Self::tick), mapped to `[0, 1]`.
    pub fn tick_unipolar(&mut self) -> f32 {
        bipolar_to_unipolar(self.tick())
    }
}
