//! Ordinary least squares solver.
//!
//! Every candidate model tried during elimination is a small regression of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We use SVD so tall design matrices (many more rows than columns) are solved
//!   robustly. (Nalgebra's `QR::solve` is intended for square systems.)
//! - Rank-deficient designs are rejected rather than given a minimum-norm solution.
//! - The SVD also gives `(X'X)^{-1} = V Σ^{-2} V'` for free, which is what the
//!   coefficient standard errors need.

use nalgebra::{DMatrix, DVector};

/// Solution of a full-rank least squares problem.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub beta: DVector<f64>,
    /// `(X'X)^{-1}`, unscaled by the residual variance.
    pub xtx_inv: DMatrix<f64>,
}

/// Numerical rank of `x` using the usual `max(n, p) * eps * σ_max` cutoff.
pub fn numerical_rank(x: &DMatrix<f64>) -> usize {
    let (n, p) = x.shape();
    if n == 0 || p == 0 {
        return 0;
    }
    let svd = x.clone().svd(false, false);
    let tol = rank_tolerance(svd.singular_values.max(), n, p);
    svd.rank(tol)
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system has fewer rows than columns, is rank deficient,
/// or yields non-finite coefficients.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<LeastSquares> {
    let (n, p) = x.shape();
    if p == 0 || n < p || y.len() != n {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let tol = rank_tolerance(svd.singular_values.max(), n, p);
    if svd.rank(tol) < p {
        return None;
    }

    let beta = svd.solve(y, tol).ok()?;
    if !beta.iter().all(|v| v.is_finite()) {
        return None;
    }

    let v_t = svd.v_t.as_ref()?;
    let inv_sq = DVector::from_iterator(p, svd.singular_values.iter().map(|s| 1.0 / (s * s)));
    let xtx_inv = v_t.transpose() * DMatrix::from_diagonal(&inv_sq) * v_t;

    Some(LeastSquares { beta, xtx_inv })
}

fn rank_tolerance(max_singular: f64, n: usize, p: usize) -> f64 {
    max_singular * (n.max(p) as f64) * f64::EPSILON
}
