use std::ops::Index;

use crate::MAX_HARMONICS;

/*
Polynomial Waveshaping
======================

A waveshaper passes every sample through a fixed transfer function:

    output = f(input)

Here f is a polynomial:

    f(x) = c0 + c1·x + c2·x² + ... + cN·x^N

Evaluated with Horner's rule, this takes one multiply-add per coefficient and
needs no temporary storage:

    f(x) = c0 + x·(c1 + x·(c2 + ... + x·cN))

With N = 16, that is 16 multiply-adds per sample. This is cheap enough to run
on every sample of every block.

Why f64 Coefficients?
---------------------

The coefficients come from Chebyshev expansions, which alternate in sign and
grow as 2^n. For a 16th harmonic they reach the hundreds of thousands, and
most of that magnitude cancels out when |x| ≤ 1. In f32 the cancellation eats
the mantissa and the output gets audibly noisy near the peaks. Accumulating in
f64 keeps the result clean. Samples still enter and leave as f32.

Publishing
----------

`Coefficients` is a fixed-capacity `Copy` value. Swapping in a new set is a
plain assignment of a complete value. There is no reallocation and nothing
can be observed half-written. See `chain::oscillator` for how sets travel
between threads.
*/

/// Slots available: one per power from x^0 to x^MAX_HARMONICS.
pub const MAX_COEFFICIENTS: usize = MAX_HARMONICS + 1;

/// Polynomial coefficients, index i = coefficient of x^i.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    values: [f64; MAX_COEFFICIENTS],
    len: usize,
}

impl Coefficients {
    /// A single zero coefficient: every input maps to silence.
    pub const fn silent() -> Self {
        Self {
            values: [0.0; MAX_COEFFICIENTS],
            len: 1,
        }
    }

    /// f(x) = x
    pub fn passthrough() -> Self {
        Self::from_slice(&[0.0, 1.0])
    }

    /// Copy up to `MAX_COEFFICIENTS` values; anything past that is dropped.
    pub fn from_slice(values: &[f64]) -> Self {
        let len = values.len().min(MAX_COEFFICIENTS);
        let mut out = Self {
            values: [0.0; MAX_COEFFICIENTS],
            len,
        };
        out.values[..len].copy_from_slice(&values[..len]);
        out
    }

    /// Zeroed set of `len` coefficients (clamped to capacity).
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            values: [0.0; MAX_COEFFICIENTS],
            len: len.min(MAX_COEFFICIENTS),
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values[..self.len]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value at x = 1, which is simply the sum of the coefficients.
    pub fn sum(&self) -> f64 {
        self.as_slice().iter().sum()
    }

    /// Horner evaluation.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.as_slice()
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::silent()
    }
}

impl Index<usize> for Coefficients {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

/// Holds the active transfer function for the audio thread.
#[derive(Debug, Clone, Default)]
pub struct PolynomialEvaluator {
    coefficients: Coefficients,
}

impl PolynomialEvaluator {
    pub fn new(coefficients: Coefficients) -> Self {
        Self { coefficients }
    }

    /// Replace the active set wholesale.
    #[inline]
    pub fn set_coefficients(&mut self, coefficients: Coefficients) {
        self.coefficients = coefficients;
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    #[inline]
    pub fn evaluate(&self, x: f32) -> f32 {
        self.coefficients.evaluate(x as f64) as f32
    }

    /// Shape a buffer in place.
    pub fn evaluate_buffer(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.evaluate(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horner_matches_power_sum() {
        // f(x) = 1 - 2x + 3x²
        let coeffs = Coefficients::from_slice(&[1.0, -2.0, 3.0]);
        for &x in &[-1.0, -0.5, 0.0, 0.25, 1.0] {
            let expected = 1.0 - 2.0 * x + 3.0 * x * x;
            assert!((coeffs.evaluate(x) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn passthrough_returns_input() {
        let eval = PolynomialEvaluator::new(Coefficients::passthrough());
        for &x in &[-1.0f32, -0.3, 0.0, 0.7, 1.0] {
            assert_eq!(eval.evaluate(x), x);
        }
    }

    #[test]
    fn default_evaluator_is_silent() {
        let eval = PolynomialEvaluator::default();
        assert_eq!(eval.evaluate(0.8), 0.0);
        assert_eq!(eval.coefficients().len(), 1);
    }

    #[test]
    fn set_coefficients_replaces_whole_set() {
        let mut eval = PolynomialEvaluator::new(Coefficients::from_slice(&[0.0, 0.0, 0.0, 1.0]));
        eval.set_coefficients(Coefficients::passthrough());
        assert_eq!(eval.coefficients().as_slice(), &[0.0, 1.0]);
        assert!((eval.evaluate(0.5) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn from_slice_truncates_to_capacity() {
        let long = vec![1.0; MAX_COEFFICIENTS + 8];
        let coeffs = Coefficients::from_slice(&long);
        assert_eq!(coeffs.len(), MAX_COEFFICIENTS);
        assert_eq!(coeffs.sum(), MAX_COEFFICIENTS as f64);
    }

    #[test]
    fn evaluate_buffer_shapes_in_place() {
        // f(x) = x²
        let eval = PolynomialEvaluator::new(Coefficients::from_slice(&[0.0, 0.0, 1.0]));
        let mut buffer = vec![-1.0, 0.5, 0.0];
        eval.evaluate_buffer(&mut buffer);
        assert_eq!(buffer, vec![1.0, 0.25, 0.0]);
    }
}
