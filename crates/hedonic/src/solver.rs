//! Small dense symmetric solver for the hedonic refit.
//!
//! The refit builds normal equations `XᵀX β = Xᵀy` incrementally — one
//! outer product per sale record, never materializing X — and solves them
//! by Cholesky decomposition with a small ridge term on the diagonal.
//! Matrices here are tiny (n ≤ 16), so everything is flat row-major slices
//! and no linear-algebra dependency is warranted.

use sim_core::{MarketError, Result};

/// Ridge regularization added to the diagonal before factorization.
pub const RIDGE_LAMBDA: f64 = 1e-4;

/// Largest supported system dimension.
pub const MAX_DIM: usize = 16;

/// Accumulate `m += s * v * vᵀ` into a row-major n×n matrix.
pub fn add_outer_product(m: &mut [f64], n: usize, v: &[f64], s: f64) {
    debug_assert_eq!(m.len(), n * n);
    debug_assert_eq!(v.len(), n);
    for i in 0..n {
        let vi = v[i] * s;
        for j in 0..n {
            m[i * n + j] += vi * v[j];
        }
    }
}

/// Accumulate `y += s * v`.
pub fn add_scaled_vector(y: &mut [f64], v: &[f64], s: f64) {
    debug_assert_eq!(y.len(), v.len());
    for (yi, vi) in y.iter_mut().zip(v) {
        *yi += s * vi;
    }
}

/// Solve `(A + λI) x = b` for symmetric positive-semidefinite `A` given as
/// a row-major n×n slice, via Cholesky decomposition.
///
/// Returns [`MarketError::NotPositiveDefinite`] when factorization hits a
/// non-positive pivot; the caller keeps its previous coefficients.
pub fn solve_ridge(a: &[f64], b: &[f64], n: usize) -> Result<Vec<f64>> {
    debug_assert!(n <= MAX_DIM, "dimension {} exceeds solver limit", n);
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(b.len(), n);

    // Lower-triangular factor of A + λI.
    let mut l = vec![0.0f64; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            if i == j {
                sum += RIDGE_LAMBDA;
            }
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if !(sum > 0.0) || !sum.is_finite() {
                    return Err(MarketError::NotPositiveDefinite);
                }
                l[i * n + i] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }

    // Forward solve L z = b.
    let mut z = vec![0.0f64; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[i * n + k] * z[k];
        }
        z[i] = sum / l[i * n + i];
    }

    // Back solve Lᵀ x = z.
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[k * n + i] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }
    Ok(x)
}
