//! Benchmarks for the stereo effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rogue_dsp::dsp::tables;
use rogue_dsp::effects::{Chorus, Effect, Phaser, Reverb, StereoDelay};

use crate::BLOCK_SIZES;

fn bench_one(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    size: usize,
    input: &[f32],
    effect: &mut impl Effect,
) {
    let mut left = input.to_vec();
    let mut right = input.to_vec();
    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
        b.iter(|| {
            left.copy_from_slice(input);
            right.copy_from_slice(input);
            effect.process(black_box(&mut left), black_box(&mut right));
        })
    });
}

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/effects");
    tables::init();
    let sr = 48_000.0;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

        let mut chorus = Chorus::new(sr);
        chorus.set_coefficients(15.0, 3.0, 0.8, 0.3, 0.5);
        bench_one(&mut group, "chorus", size, &input, &mut chorus);

        let mut phaser = Phaser::new(sr);
        phaser.set_coefficients(0.5, 0.7, 0.5, 0.5);
        bench_one(&mut group, "phaser", size, &input, &mut phaser);

        let mut delay = StereoDelay::new(sr);
        delay.set_coefficients(120.0, 0.75, 0.5, 0.5, 0.4, 0.5, 80.0, 6_000.0);
        bench_one(&mut group, "stereo_delay", size, &input, &mut delay);

        // 8 modulated lines, 8 diffusers, 8 random draws per sample
        let mut reverb = Reverb::new(sr, 1);
        reverb.set_coefficients(0.02, 0.85, 6_000.0, 40.0, 12_000.0, 0.3);
        bench_one(&mut group, "reverb", size, &input, &mut reverb);
    }

    group.finish();
}
