//! Benchmarks for the filter bank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rogue_dsp::dsp::filter::{
    BiQuadDf2, CombFilter, Filter, HuovilainenFilter, LadderFilter, StateVariableFilter, SvfType, TrapezoidalSvf,
};
use rogue_dsp::dsp::tables;

use crate::BLOCK_SIZES;

fn bench_one(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    size: usize,
    input: &[f32],
    filter: &mut impl Filter,
) {
    let mut buffer = input.to_vec();
    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
        b.iter(|| {
            buffer.copy_from_slice(input);
            filter.render(black_box(&mut buffer));
        })
    });
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    tables::init();
    let sr = 48_000.0;

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size).map(|i| (i as f32 / size as f32) * 2.0 - 1.0).collect();

        let mut biquad = BiQuadDf2::new();
        biquad.set_lowpass(1_000.0, 0.707, sr);
        bench_one(&mut group, "biquad_lowpass", size, &input, &mut biquad);

        // Polynomial-fitted ladder, tanh table in the loop
        let mut ladder = LadderFilter::new(sr);
        ladder.set_coefficients(1_000.0, 0.5);
        bench_one(&mut group, "ladder", size, &input, &mut ladder);

        // 2x oversampled
        let mut huovilainen = HuovilainenFilter::new(sr);
        huovilainen.set_coefficients(1_000.0, 0.5);
        bench_one(&mut group, "huovilainen", size, &input, &mut huovilainen);

        let mut svf = StateVariableFilter::new(sr);
        svf.set_type(SvfType::BandPass);
        svf.set_coefficients(1_000.0, 0.5);
        bench_one(&mut group, "svf_chamberlin", size, &input, &mut svf);

        let mut svf = TrapezoidalSvf::lowpass(sr, 1_000.0);
        svf.set_resonance(0.5);
        bench_one(&mut group, "svf_trapezoidal", size, &input, &mut svf);

        let mut comb = CombFilter::new(sr);
        comb.set_coefficients(220.0, 0.7);
        bench_one(&mut group, "comb", size, &input, &mut comb);
    }

    group.finish();
}
