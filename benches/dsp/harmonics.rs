//! Benchmarks for solving harmonic gains into a waveshaping polynomial.
//!
//! This runs on the control thread, not inside the audio callback, but it
//! bounds how fast a knob can be swept.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rosemary_dsp::dsp::binomial::BinomialTable;
use rosemary_dsp::dsp::harmonics::{self, HarmonicProfile};

pub fn bench_harmonics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/harmonics");
    let table = BinomialTable::shared();

    for count in [4usize, 16, 32] {
        let gains: Vec<f32> = (0..count).map(|i| 1.0 / (i + 1) as f32).collect();
        group.bench_with_input(BenchmarkId::new("solve", count), &count, |b, _| {
            b.iter(|| black_box(harmonics::solve(black_box(&gains), table)))
        });

        let mut profile = HarmonicProfile::new(count, harmonics::ROLLOFF_SHARPNESS);
        group.bench_with_input(BenchmarkId::new("shape_and_solve", count), &count, |b, _| {
            b.iter(|| {
                profile.apply_shape_x(black_box(0.6));
                profile.apply_shape_y(black_box(0.4));
                black_box(profile.solve(table))
            })
        });
    }

    group.finish();
}
