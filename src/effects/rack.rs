//! Effects rack: the four effects chained in a fixed order.
//!
//! ```text
//! in → [chorus] → [phaser] → [delay] → [reverb] → out
//! ```
//!
//! A disabled slot is skipped entirely and keeps whatever state it had. The
//! rack walks the buffers in chunks of at most `block_size` samples, so each
//! effect sees the same block length a host would hand it.

use super::{Chorus, Effect, Phaser, Reverb, StereoDelay};
use crate::config::EngineConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
struct Slot<E> {
    effect: E,
    enabled: bool,
}

impl<E: Effect> Slot<E> {
    fn new(effect: E) -> Self {
        Self { effect, enabled: false }
    }

    #[inline]
    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if self.enabled {
            self.effect.process(left, right);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectsRack {
    config: EngineConfig,
    chorus: Slot<Chorus>,
    phaser: Slot<Phaser>,
    delay: Slot<StereoDelay>,
    reverb: Slot<Reverb>,
}

impl EffectsRack {
    /// Build every effect for `config`. All slots start disabled.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let sr = config.sample_rate;
        log::debug!(
            "effects rack: {} Hz, blocks of {}, seed {:#x}",
            sr,
            config.block_size,
            config.seed
        );
        Ok(Self {
            config: *config,
            chorus: Slot::new(Chorus::new(sr)),
            phaser: Slot::new(Phaser::new(sr)),
            delay: Slot::new(StereoDelay::new(sr)),
            reverb: Slot::new(Reverb::new(sr, config.seed)),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn chorus(&mut self) -> &mut Chorus {
        &mut self.chorus.effect
    }

    pub fn phaser(&mut self) -> &mut Phaser {
        &mut self.phaser.effect
    }

    pub fn delay(&mut self) -> &mut StereoDelay {
        &mut self.delay.effect
    }

    pub fn reverb(&mut self) -> &mut Reverb {
        &mut self.reverb.effect
    }

    pub fn set_chorus_enabled(&mut self, enabled: bool) {
        self.chorus.enabled = enabled;
    }

    pub fn set_phaser_enabled(&mut self, enabled: bool) {
        self.phaser.enabled = enabled;
    }

    pub fn set_delay_enabled(&mut self, enabled: bool) {
        self.delay.enabled = enabled;
    }

    pub fn set_reverb_enabled(&mut self, enabled: bool) {
        self.reverb.enabled = enabled;
    }

    /// `[chorus, phaser, delay, reverb]`
    pub fn enabled(&self) -> [bool; 4] {
        [self.chorus.enabled, self.phaser.enabled, self.delay.enabled, self.reverb.enabled]
    }
}

impl Effect for EffectsRack {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("effects rack", sample_rate) {
            return;
        }
        log::debug!("effects rack: sample rate {} -> {}", self.config.sample_rate, sample_rate);
        self.config.sample_rate = sample_rate;
        self.chorus.effect.set_sample_rate(sample_rate);
        self.phaser.effect.set_sample_rate(sample_rate);
        self.delay.effect.set_sample_rate(sample_rate);
        self.reverb.effect.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.chorus.effect.reset();
        self.phaser.effect.reset();
        self.delay.effect.reset();
        self.reverb.effect.reset();
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let n = left.len().min(right.len());
        let block = self.config.block_size;
        for (l, r) in left[..n].chunks_mut(block).zip(right[..n].chunks_mut(block)) {
            self.chorus.process(l, r);
            self.phaser.process(l, r);
            self.delay.process(l, r);
            self.reverb.process(l, r);
        }
    }
}
