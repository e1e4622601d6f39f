//! Low-level DSP primitives used by the voice and effect layers.
//!
//! Everything here is allocation-free once constructed and realtime-safe, so
//! the components can be embedded directly inside voice and effect structs.
//! The only state shared between instances is the read-only lookup tables.

/// Integer and fractional delay lines on a circular buffer.
pub mod delay;
/// Pre-delay/attack/hold/decay/sustain/release envelope generator.
pub mod envelope;
/// First/second-order sections, ladder, state-variable and comb filters.
pub mod filter;
/// Low-frequency modulation sources.
pub mod lfo;
/// Phase-accumulator oscillators and noise sources.
pub mod oscillator;
/// Seedable random source.
pub mod rng;
/// Shared sine/cosine/tanh lookup tables.
pub mod tables;

pub use envelope::{Envelope, EnvelopeStage};
pub use lfo::{Lfo, LfoWaveform};
pub use oscillator::{Oscillator, OscillatorType};
pub use rng::NoiseSource;
