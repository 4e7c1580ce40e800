//! Cached binomial coefficients for Chebyshev expansion.

use once_cell::sync::OnceCell;

/*
Binomial Coefficients
=====================

C(n, k) counts the ways to choose k items out of n. The Chebyshev expansion in
`harmonics` needs C(n - j - 1, j) for every harmonic n and every term j, and it
runs each time a control moves. Recomputing the products from scratch on every
call is wasteful, so we build a small table once and look values up.

Storage
-------

Pascal's triangle is symmetric: C(n, k) = C(n, n - k). Each row therefore only
stores the left half (k = 0 ..= n/2). Rows are packed back to back:

    row 0:  [1]
    row 1:  [1]
    row 2:  [1, 2]
    row 3:  [1, 3]
    row 4:  [1, 4, 6]
    ...

`row_start[n]` is the offset of row n in the flat buffer.

Each row is filled with the multiplicative recurrence

    C(n, k) = C(n, k - 1) * (n - k + 1) / k

in integer arithmetic. The division is always exact, so there is no rounding
drift. For n < 32 the intermediate product stays far below i64::MAX.

Lookups past the table bound fall back to computing on demand.
*/

/// Rows precomputed by [`BinomialTable::new`] (n = 0 .. MAX_N).
pub const MAX_N: usize = 32;

static SHARED: OnceCell<BinomialTable> = OnceCell::new();

/// Half-triangle of binomial coefficients, immutable once built.
#[derive(Debug, Clone)]
pub struct BinomialTable {
    coeffs: Vec<i64>,
    row_start: Vec<usize>,
}

impl BinomialTable {
    pub fn new() -> Self {
        let mut coeffs = Vec::with_capacity((0..MAX_N).map(|n| n / 2 + 1).sum());
        let mut row_start = Vec::with_capacity(MAX_N);

        for n in 0..MAX_N as i64 {
            row_start.push(coeffs.len());

            let mut value = 1i64;
            coeffs.push(value);
            for k in 1..=n / 2 {
                value = value * (n - k + 1) / k;
                coeffs.push(value);
            }
        }

        Self { coeffs, row_start }
    }

    /// Process-wide table, built by whichever caller gets here first.
    ///
    /// Concurrent first callers block on the one initializer; every later call
    /// is a plain read of immutable data.
    pub fn shared() -> &'static BinomialTable {
        SHARED.get_or_init(|| {
            log::debug!("building binomial table for n < {MAX_N}");
            BinomialTable::new()
        })
    }

    /// C(n, k). Returns 0 for negative arguments or k > n.
    pub fn get(&self, n: i32, k: i32) -> i64 {
        if n < 0 || k < 0 || k > n {
            return 0;
        }

        let k = k.min(n - k);
        let (n, k) = (n as usize, k as usize);

        if n < MAX_N {
            self.coeffs[self.row_start[n] + k]
        } else {
            compute(n as u64, k as u64)
        }
    }
}

impl Default for BinomialTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Direct evaluation for rows outside the table. Saturates at `i64::MAX`.
fn compute(n: u64, k: u64) -> i64 {
    let mut value: u128 = 1;
    for i in 1..=k as u128 {
        value = value * (n as u128 - i + 1) / i;
        if value > i64::MAX as u128 {
            return i64::MAX;
        }
    }
    value as i64
}
