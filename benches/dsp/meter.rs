//! Benchmarks for the peak meter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rosemary_dsp::dsp::meter::PeakMeter;
use rosemary_dsp::AudioBlock;

use crate::BLOCK_SIZES;

pub fn bench_meter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/meter");

    for &size in BLOCK_SIZES {
        let mut buffer: Vec<f32> = (0..2 * size).map(|i| ((i % 97) as f32 / 97.0) - 0.5).collect();

        let meter = PeakMeter::default();
        meter.set_sample_rate(48_000);
        group.bench_with_input(BenchmarkId::new("stereo_block", size), &size, |b, _| {
            b.iter(|| {
                let block = AudioBlock::new(black_box(&mut buffer), 2);
                meter.process_block(&block);
                black_box(meter.peak_db())
            })
        });
    }

    group.finish();
}
