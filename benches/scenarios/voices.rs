//! Benchmarks for complete voice chains.
//!
//! oscillators → ladder → amp envelope, rendered the way a host renders a
//! voice: parameters once per block, samples in 64-sample chunks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rogue_dsp::dsp::filter::{Filter, LadderFilter};
use rogue_dsp::dsp::{tables, Envelope, Lfo, Oscillator, OscillatorType};
use rogue_dsp::effects::{Effect, EffectsRack};
use rogue_dsp::EngineConfig;

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

struct Voice {
    osc_a: Oscillator,
    osc_b: Oscillator,
    filter: LadderFilter,
    amp: Envelope,
    lfo: Lfo,
    scratch: Vec<f32>,
    sync: Vec<f32>,
}

impl Voice {
    fn new(a: OscillatorType, b: OscillatorType, max_block: usize) -> Self {
        let mut osc_a = Oscillator::new(SR);
        osc_a.set_type(a);
        osc_a.set_frequency(110.0);
        let mut osc_b = Oscillator::new(SR);
        osc_b.set_type(b);
        osc_b.set_frequency(110.5);

        let mut amp = Envelope::adsr(0.01 * SR, 0.1 * SR, 0.7, 0.15 * SR);
        amp.set_retrigger(true);
        amp.on();

        let mut lfo = Lfo::new(SR, 1);
        lfo.set_frequency(0.3);

        Self {
            osc_a,
            osc_b,
            filter: LadderFilter::new(SR),
            amp,
            lfo,
            scratch: vec![0.0; max_block],
            sync: vec![0.0; max_block],
        }
    }

    fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(64) {
            let n = chunk.len();
            // Filter sweep at block rate
            let cutoff = 800.0 + 600.0 * self.lfo.tick_block(n);
            self.filter.set_coefficients(cutoff, 0.5);

            self.osc_a.process(chunk, &mut self.sync[..n]);
            self.osc_b.process(&mut self.scratch[..n], &mut self.sync[..n]);
            for (y, b) in chunk.iter_mut().zip(&self.scratch) {
                *y = self.filter.tick(0.5 * (*y + b)) * self.amp.tick();
            }
        }
    }
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    tables::init();
    let max_block = BLOCK_SIZES.iter().copied().max().unwrap_or(512);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SIMPLE VOICE ===
        // two detuned bandlimited saws
        let mut lead = Voice::new(OscillatorType::VaSaw, OscillatorType::VaSaw, max_block);
        group.bench_with_input(BenchmarkId::new("va_saws", size), &size, |b, _| {
            b.iter(|| {
                lead.render(black_box(&mut buffer));
            })
        });

        // === HEAVY VOICE ===
        // super saw + additive square: the most expensive families
        let mut pad = Voice::new(OscillatorType::SuperSaw, OscillatorType::AsSquare, max_block);
        group.bench_with_input(BenchmarkId::new("super_additive", size), &size, |b, _| {
            b.iter(|| {
                pad.render(black_box(&mut buffer));
            })
        });

        // === VOICE + RACK ===
        let mut voice = Voice::new(OscillatorType::VaSaw, OscillatorType::PdRes2, max_block);
        let config = EngineConfig {
            sample_rate: SR,
            ..EngineConfig::default()
        };
        let mut rack = EffectsRack::new(&config).expect("valid config");
        rack.set_chorus_enabled(true);
        rack.set_phaser_enabled(true);
        rack.set_delay_enabled(true);
        rack.set_reverb_enabled(true);
        let mut right = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("voice_rack", size), &size, |b, _| {
            b.iter(|| {
                voice.render(&mut buffer);
                right.copy_from_slice(&buffer);
                rack.process(black_box(&mut buffer), black_box(&mut right));
            })
        });
    }

    group.finish();
}
