//! Low-level DSP primitives used by the chain stages.
//!
//! Everything on the per-sample path here is allocation-free and realtime-safe.
//! The exception is `harmonics::solve`, which is meant for the control thread:
//! its output is handed to the audio thread as a finished `Coefficients` value.

/// Cached binomial coefficients.
pub mod binomial;
/// Equal-power volume and pan gains.
pub mod gain;
/// Harmonic gains → normalized Chebyshev waveshaping polynomial.
pub mod harmonics;
/// Decaying peak-level meter.
pub mod meter;
/// Phase accumulator and sine carrier.
pub mod oscillator;
/// Polynomial coefficients and Horner evaluation.
pub mod polynomial;

pub use binomial::BinomialTable;
pub use harmonics::HarmonicProfile;
pub use meter::PeakMeter;
pub use oscillator::PhaseOscillator;
pub use polynomial::{Coefficients, PolynomialEvaluator};
