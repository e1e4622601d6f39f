//! Stereo block effects and the rack that chains them.
//!
//! ```text
//! | effect      | built from                                     |
//! | ----------- | ---------------------------------------------- |
//! | Chorus      | two LFO-modulated Hermite-interpolated delays  |
//! | Phaser      | 8 first-order allpasses per channel + feedback |
//! | StereoDelay | two integer delays, HP → LP in the feedback    |
//! | Reverb      | pre-delay, tone filters, 8-line FDN            |
//! ```
//!
//! Every effect adds its wet signal on top of the buffers it is given, so
//! a wet amount of zero leaves the audio untouched.

pub mod chorus;
pub mod delay;
pub mod phaser;
pub mod rack;
pub mod reverb;

pub use chorus::Chorus;
pub use delay::StereoDelay;
pub use phaser::Phaser;
pub use rack::EffectsRack;
pub use reverb::Reverb;

/// A stereo in-place processor.
pub trait Effect {
    /// Setup-time; may reallocate internal buffers.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Return to the silent state of a fresh instance. Parameters are kept.
    fn reset(&mut self);

    /// Process `min(left.len(), right.len())` samples in place.
    fn process(&mut self, left: &mut [f32], right: &mut [f32]);
}

/// Seconds to whole samples, at least one.
#[inline]
pub(crate) fn samples_for(seconds: f32, sample_rate: f32) -> usize {
    ((seconds * sample_rate).ceil() as usize).max(1)
}
