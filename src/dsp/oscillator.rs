use std::f32::consts::{PI, TAU};

/*
Phase Accumulator
=================

An oscillator only needs to know where it is within one cycle. That position is
the phase, kept in [0, 1):

    0.0   start of the cycle
    0.25  a quarter of the way through (sine peak)
    0.5   halfway (sine zero crossing, going down)
    1.0   back to the start, so we wrap to 0.0

Each sample the phase moves forward by

    increment = frequency / sample_rate

Example: 441 Hz at 44.1 kHz gives an increment of 0.01. After 100 samples the
phase has travelled exactly one cycle.

Wrapping
--------

When the phase crosses 1.0 we subtract 1.0 once. A modulo is not used: as long
as |frequency| < sample_rate, a single step can never skip a whole cycle.
Frequency is clamped to Nyquist upstream, so this always holds. A negative
frequency runs the phase backwards and wraps by adding 1.0 instead.

The phase is accumulated in f64. In f32 a step smaller than half an ulp below
1.0 (a fraction of a hertz backwards) rounds `phase + 1.0` to exactly 1.0, and
the oscillator would flip between 0.0 and 1.0 forever. f64 pushes that limit
far below any audible frequency, and anything still smaller is held at the
last value below 1.0.

Carrier
-------

The carrier is sin(2π·phase), band-naive: no anti-aliasing is needed for a pure
sine. The sine is a rational approximation that is accurate over [-π, π], so
the angle is folded into that range first:

    angle = 2π·phase            in [0, 2π)
    angle > π  →  angle - 2π    in [-π, π]
*/

/// Rational sine approximation, accurate for x in [-π, π].
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    let x2 = x * x;
    let numerator = -x
        * (-11_511_339_840.0
            + x2 * (1_640_635_920.0 + x2 * (-52_785_432.0 + x2 * 479_249.0)));
    let denominator =
        11_511_339_840.0 + x2 * (277_920_720.0 + x2 * (3_177_720.0 + x2 * 18_361.0));
    numerator / denominator
}

/// sin(2π·phase) for phase in [0, 1).
#[inline]
pub fn sine_at_phase(phase: f32) -> f32 {
    let mut angle = TAU * phase;
    if angle > PI {
        angle -= TAU;
    }
    fast_sin(angle)
}

/// Per-sample phase step. Zero until the sample rate is known.
#[inline]
pub fn phase_increment(frequency: f32, sample_rate: f32) -> f32 {
    if sample_rate > 0.0 {
        frequency / sample_rate
    } else {
        0.0
    }
}

/// Largest f64 below 1.0.
const LAST_PHASE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Largest f32 below 1.0.
const LAST_PHASE_F32: f32 = 1.0 - f32::EPSILON / 2.0;

/// Sine carrier driven by a running phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseOscillator {
    phase: f64,
}

impl PhaseOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f32 {
        // rounding to f32 can land on 1.0
        (self.phase as f32).min(LAST_PHASE_F32)
    }

    /// Jump to `phase`, folded into [0, 1).
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = if phase.is_finite() {
            (phase as f64).rem_euclid(1.0).min(LAST_PHASE)
        } else {
            0.0
        };
    }

    pub fn reset(&mut self) {
        self.set_phase(0.0);
    }

    /// Emit the carrier at the current phase, then advance.
    #[inline]
    pub fn next_sample(&mut self, increment: f32) -> f32 {
        let value = sine_at_phase(self.phase as f32);

        self.phase += increment as f64;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        } else if self.phase < 0.0 {
            self.phase = (self.phase + 1.0).min(LAST_PHASE);
        }

        value
    }

    /// Fill `out` with consecutive carrier samples.
    pub fn render(&mut self, out: &mut [f32], increment: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}
