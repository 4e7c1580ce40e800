//! Benchmarks for the DSP building blocks.

mod harmonics;
mod meter;
mod oscillator;

pub use harmonics::bench_harmonics;
pub use meter::bench_meter;
pub use oscillator::bench_oscillator;
