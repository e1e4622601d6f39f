//! Benchmarks for the AHDSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rogue_dsp::dsp::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let sr = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Per-sample render, linear segments
        let mut env = Envelope::adsr(0.01 * sr, 0.2 * sr, 0.6, 0.3 * sr);
        env.set_retrigger(true);
        env.on();
        group.bench_with_input(BenchmarkId::new("render_linear", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Per-sample render, curved segments (one division per sample)
        let mut env = Envelope::adsr(0.01 * sr, 0.2 * sr, 0.6, 0.3 * sr);
        env.set_curve(0.2);
        env.set_retrigger(true);
        env.on();
        group.bench_with_input(BenchmarkId::new("render_curved", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Block-rate modulation: one tick per block
        let mut env = Envelope::adsr(0.01 * sr, 0.2 * sr, 0.6, 0.3 * sr);
        env.set_retrigger(true);
        env.on();
        group.bench_with_input(BenchmarkId::new("tick_block", size), &size, |b, &size| {
            b.iter(|| black_box(env.tick_block(black_box(size))))
        });
    }

    group.finish();
}
