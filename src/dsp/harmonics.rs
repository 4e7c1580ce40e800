//! Harmonic gains → normalized waveshaping polynomial.

use crate::dsp::binomial::BinomialTable;
use crate::dsp::polynomial::Coefficients;
use crate::MAX_HARMONICS;

/*
Harmonic Waveshaping
====================

Feed a full-scale cosine into the Chebyshev polynomial T_n and the output is a
cosine at n times the frequency:

    T_n(cos θ) = cos(nθ)

This means a weighted sum of Chebyshev polynomials, driven by a sine carrier,
produces a chosen harmonic spectrum. Each term contributes its own harmonic at
its own gain. Expanding that sum into plain powers of x gives a single
polynomial that the audio thread can evaluate with Horner's rule.

Vocabulary
----------

  gains        One amplitude per harmonic. Index 0 is the fundamental,
               index i is harmonic i + 1.

  contribution The amount harmonic n adds to the coefficient of x^i.

  peak         The polynomial's value at x = 1, where every Chebyshev term
               reaches its extreme at the same time. It equals the plain sum
               of the coefficients.


Contribution of Harmonic n to Power i
-------------------------------------

Chebyshev polynomials only contain powers with the same parity as n, and never
above n. Everything else is zero:

    i > n            → 0
    (n - i) odd      → 0

Otherwise:

    n · Σ_{j=0}^{(n-i)/2} (-1)^j · C(n-j-1, j) · 2^(n-2j-i)

The binomials come from the shared `BinomialTable`.


Normalization
-------------

Raw coefficients can sum to anything. Left alone, moving a harmonic slider would
also move the output level, often far past full scale. After summing all
contributions, every coefficient is divided by the peak so that f(1) = 1 and the
shaped waveform tops out at exactly full scale.

If the peak is (near) zero, for example when every gain is zero, there is
nothing to normalize against. The coefficients are left as they are and the
output is silence.


Shape Controls
--------------

Two scalars sculpt the whole spectrum instead of one slider per harmonic:

  shape X   even harmonics (2nd, 4th, ...), i.e. odd indices
  shape Y   odd harmonics above the fundamental (3rd, 5th, ...), i.e. even
            indices from 2

Each targeted harmonic gets

    gain(index) = shape^((index + 1) · sharpness / 2) / (index + 1)

At shape = 1 this is the plain 1/n rolloff of a sawtooth (X) or square (Y).
Below 1 the higher harmonics fall away faster, and `sharpness` sets how much
faster. The fundamental is always pinned at 1.0.
*/

/// Below this |f(1)| the coefficients are left unnormalized.
pub const NORMALIZATION_EPSILON: f64 = 1e-10;

/// Default exponent scale for the shape rolloff.
pub const ROLLOFF_SHARPNESS: f32 = 1.2;

/// Harmonic count used when nothing else is configured.
pub const DEFAULT_HARMONIC_COUNT: usize = 16;

/// Coefficient of x^i contributed by harmonic `n` (1-based).
pub fn chebyshev_contribution(n: usize, i: usize, table: &BinomialTable) -> f64 {
    if i > n || (n - i) % 2 != 0 {
        return 0.0;
    }

    let sum: f64 = (0..=(n - i) / 2)
        .map(|j| {
            let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
            let binomial = table.get(n as i32 - j as i32 - 1, j as i32) as f64;
            sign * binomial * 2.0_f64.powi((n - 2 * j - i) as i32)
        })
        .sum();

    n as f64 * sum
}

/// Unnormalized coefficient of x^i for the whole gain vector.
pub fn calculate_coefficient(i: usize, gains: &[f32], table: &BinomialTable) -> f64 {
    gains
        .iter()
        .enumerate()
        .filter(|(_, gain)| gain.is_finite() && **gain != 0.0)
        .map(|(index, &gain)| gain as f64 * chebyshev_contribution(index + 1, i, table))
        .sum()
}

/// Build the normalized waveshaping polynomial for `gains`.
///
/// Allocation-free, but O(harmonics²) binomial terms: call it from the
/// control thread, never from a render callback.
pub fn solve(gains: &[f32], table: &BinomialTable) -> Coefficients {
    let gains = if gains.len() > MAX_HARMONICS {
        log::warn!(
            "{} harmonic gains supplied, ignoring everything past {MAX_HARMONICS}",
            gains.len()
        );
        &gains[..MAX_HARMONICS]
    } else {
        gains
    };

    let mut coeffs = Coefficients::zeroed(gains.len() + 1);
    for (i, coeff) in coeffs.as_mut_slice().iter_mut().enumerate() {
        *coeff = calculate_coefficient(i, gains, table);
    }

    let peak = coeffs.sum();
    if peak.abs() > NORMALIZATION_EPSILON {
        let norm = 1.0 / peak;
        for coeff in coeffs.as_mut_slice() {
            *coeff *= norm;
        }
    }

    coeffs
}

/// Gain for one harmonic index under a shape control.
pub fn shaped_gain(index: usize, shape: f32, sharpness: f32) -> f32 {
    if index == 0 {
        return 1.0;
    }

    let shape = if shape.is_nan() { 0.0 } else { shape.clamp(0.0, 1.0) };
    let harmonic = (index + 1) as f32;
    shape.powf(harmonic * sharpness / 2.0) / harmonic
}

/// Control-side harmonic gain state.
///
/// Owns the gain vector that the shape controls rewrite. Lives with the control
/// thread; the audio thread only ever sees the solved `Coefficients`.
#[derive(Debug, Clone)]
pub struct HarmonicProfile {
    gains: Vec<f32>,
    harmonic_count: usize,
    rolloff_sharpness: f32,
}

impl HarmonicProfile {
    /// Fundamental only, `harmonic_count` slots.
    pub fn new(harmonic_count: usize, rolloff_sharpness: f32) -> Self {
        let harmonic_count = harmonic_count.clamp(1, MAX_HARMONICS);
        let mut gains = vec![0.0; harmonic_count];
        gains[0] = 1.0;

        Self {
            gains,
            harmonic_count,
            rolloff_sharpness,
        }
    }

    pub fn gains(&self) -> &[f32] {
        &self.gains
    }

    pub fn harmonic_count(&self) -> usize {
        self.harmonic_count
    }

    pub fn rolloff_sharpness(&self) -> f32 {
        self.rolloff_sharpness
    }

    /// Replace the gain vector (truncated to `MAX_HARMONICS`).
    pub fn set_gains(&mut self, gains: &[f32]) {
        let len = gains.len().min(MAX_HARMONICS);
        if len < gains.len() {
            log::warn!("truncating {} harmonic gains to {MAX_HARMONICS}", gains.len());
        }
        self.gains.clear();
        self.gains.extend_from_slice(&gains[..len]);
    }

    /// Rewrite the even harmonics (odd indices).
    pub fn apply_shape_x(&mut self, x: f32) {
        self.apply_shape(1, x);
    }

    /// Rewrite the odd harmonics above the fundamental (even indices from 2).
    pub fn apply_shape_y(&mut self, y: f32) {
        self.apply_shape(2, y);
    }

    fn apply_shape(&mut self, first_index: usize, shape: f32) {
        self.gains.resize(self.harmonic_count, 0.0);
        for index in (first_index..self.harmonic_count).step_by(2) {
            self.gains[index] = shaped_gain(index, shape, self.rolloff_sharpness);
        }
        self.gains[0] = 1.0;
    }

    pub fn solve(&self, table: &BinomialTable) -> Coefficients {
        solve(&self.gains, table)
    }
}

impl Default for HarmonicProfile {
    fn default() -> Self {
        Self::new(DEFAULT_HARMONIC_COUNT, ROLLOFF_SHARPNESS)
    }
}
