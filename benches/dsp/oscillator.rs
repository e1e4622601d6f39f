//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rogue_dsp::dsp::{tables, Oscillator, OscillatorType};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    tables::init();

    // One representative per family, plus the naive saw as a baseline.
    let types = [
        ("va_saw", OscillatorType::VaSaw),
        ("va_pulse", OscillatorType::VaPulse),
        ("pd_res1", OscillatorType::PdRes1),
        ("el_alpha1", OscillatorType::ElAlpha1),
        ("additive_saw", OscillatorType::AsSaw),
        ("super_saw", OscillatorType::SuperSaw),
        ("noise_pink", OscillatorType::NoisePink),
        ("noise_bp", OscillatorType::NoiseBp),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut sync_out = vec![0.0f32; size];

        for (name, osc_type) in types {
            let mut osc = Oscillator::new(48_000.0);
            osc.set_type(osc_type);
            osc.set_frequency(440.0);
            osc.set_width(0.4);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.process(black_box(&mut buffer), black_box(&mut sync_out));
                })
            });
        }

        // Naive saw - no PolyBLEP
        let mut osc = Oscillator::new(48_000.0);
        osc.set_bandlimit(false);
        osc.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("naive_saw", size), &size, |b, _| {
            b.iter(|| {
                osc.process(black_box(&mut buffer), black_box(&mut sync_out));
            })
        });

        // Hard sync + phase modulation - the slowest render path
        let mut master = Oscillator::new(48_000.0);
        master.set_frequency(110.0);
        let mut master_out = vec![0.0f32; size];
        let mut master_sync = vec![0.0f32; size];
        master.process(&mut master_out, &mut master_sync);
        let mut slave = Oscillator::new(48_000.0);
        slave.set_type(OscillatorType::VaPulse);
        slave.set_frequency(370.0);
        slave.set_modulation(0.2, true);
        group.bench_with_input(BenchmarkId::new("sync_pm_pulse", size), &size, |b, _| {
            b.iter(|| {
                slave.process_modulated(
                    black_box(&master_out),
                    black_box(&master_sync),
                    black_box(&mut buffer),
                    black_box(&mut sync_out),
                );
            })
        });
    }

    group.finish();
}
