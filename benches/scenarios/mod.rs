//! Real-world scenario benchmarks.
//!
//! A complete synth voice as a host would run it, with and without effects.

mod voices;

pub use voices::bench_voices;
