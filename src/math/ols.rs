//! Ordinary least squares solver.
//!
//! We solve small regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where `X` is a Vandermonde matrix of the size axis. Raw benchmark sizes go
//! into the thousands, so `n³` columns are many orders of magnitude larger
//! than the constant column. Each column is scaled to unit norm before the
//! solve and the coefficients are un-scaled afterwards.
//!
//! SVD handles tall (more rows than columns) and rank-deficient systems; in
//! the rank-deficient case it returns the minimum-norm solution.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD on a column-scaled design matrix.
///
/// Returns `None` if no finite solution could be produced.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let mut scaled = x.clone();
    let mut scales = Vec::with_capacity(x.ncols());
    for j in 0..x.ncols() {
        let norm = x.column(j).norm();
        let s = if norm.is_finite() && norm > 0.0 { norm } else { 1.0 };
        for i in 0..x.nrows() {
            scaled[(i, j)] /= s;
        }
        scales.push(s);
    }

    let svd = scaled.svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            let beta = DVector::from_iterator(
                beta.len(),
                beta.iter().zip(scales.iter()).map(|(b, s)| b / s),
            );
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
