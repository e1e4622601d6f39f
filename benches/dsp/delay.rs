//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rogue_dsp::dsp::delay::{Delay, DelayA, DelayH, DelayL};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Test with different delay times (in samples)
    let delay_times: &[usize] = &[
        480,   // 10ms at 48kHz
        4800,  // 100ms at 48kHz
        48000, // 1 second at 48kHz
    ];

    for &size in BLOCK_SIZES {
        // Generate a test signal
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &delay_samples in delay_times {
            let delay_ms = delay_samples as f32 / 48.0;

            // Basic delay render (integer delay)
            let mut delay = Delay::with_capacity(delay_samples + 1);
            delay.set_delay(delay_samples);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{}ms", delay_ms as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Modulated reads (chorus-like): delay time changes every sample
        let mut linear = DelayL::with_capacity(1024);
        group.bench_with_input(BenchmarkId::new("modulated_linear", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &x) in input.iter().enumerate() {
                    linear.set_delay(480.0 + (i as f32 * 0.1).sin() * 48.0);
                    sum += linear.process(black_box(x));
                }
                sum
            })
        });

        let mut hermite = DelayH::with_capacity(1024);
        group.bench_with_input(BenchmarkId::new("modulated_hermite", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &x) in input.iter().enumerate() {
                    hermite.set_delay(480.0 + (i as f32 * 0.1).sin() * 48.0);
                    sum += hermite.process(black_box(x));
                }
                sum
            })
        });

        let mut allpass = DelayA::with_capacity(1024);
        group.bench_with_input(BenchmarkId::new("modulated_allpass", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &x) in input.iter().enumerate() {
                    allpass.set_delay(480.0 + (i as f32 * 0.1).sin() * 48.0);
                    sum += allpass.process(black_box(x));
                }
                sum
            })
        });
    }

    group.finish();
}
