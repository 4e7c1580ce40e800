//! Benchmarks for carrier generation and waveshaping.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rosemary_dsp::dsp::oscillator::{phase_increment, PhaseOscillator};
use rosemary_dsp::{AudioBlock, ProcessSpec, Processor, VoiceChain, VoiceConfig};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let increment = phase_increment(440.0, 48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Bare carrier - phase accumulator + fast sine
        let mut carrier = PhaseOscillator::new();
        group.bench_with_input(BenchmarkId::new("carrier", size), &size, |b, _| {
            b.iter(|| {
                carrier.render(black_box(&mut buffer), black_box(increment));
            })
        });

        // Full 32-term polynomial on every sample
        let config = VoiceConfig {
            harmonic_count: rosemary_dsp::MAX_HARMONICS,
            volume: 1.0,
            ..VoiceConfig::default()
        };
        let (mut chain, mut control) = VoiceChain::new(&config);
        control.oscillator.set_shape_x(0.7);
        control.oscillator.set_shape_y(0.7);
        chain.prepare(&ProcessSpec::new(48_000.0, size, 1));
        group.bench_with_input(BenchmarkId::new("voice_mono", size), &size, |b, _| {
            b.iter(|| {
                chain.process(&mut AudioBlock::mono(black_box(&mut buffer)));
            })
        });

        // Stereo adds the channel copy and the pan gains
        let mut stereo = vec![0.0f32; 2 * size];
        let (mut chain, _control) = VoiceChain::new(&config);
        chain.prepare(&ProcessSpec::new(48_000.0, size, 2));
        group.bench_with_input(BenchmarkId::new("voice_stereo", size), &size, |b, _| {
            b.iter(|| {
                chain.process(&mut AudioBlock::new(black_box(&mut stereo), 2));
            })
        });
    }

    group.finish();
}
