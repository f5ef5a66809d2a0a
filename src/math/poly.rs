//! Polynomial helpers.
//!
//! Coefficient vectors are ordered from the highest degree down to the
//! constant term, e.g. `[a, b, c]` is `a·x² + b·x + c`.

use nalgebra::DMatrix;

/// Evaluate a polynomial with Horner's scheme.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Design matrix with columns `x^degree, ..., x, 1`.
pub fn vandermonde(xs: &[f64], degree: usize) -> DMatrix<f64> {
    let cols = degree + 1;
    DMatrix::from_fn(xs.len(), cols, |i, j| xs[i].powi((degree - j) as i32))
}

/// `n` equally spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the last value so rounding never overshoots the range.
            out[n - 1] = end;
            out
        }
    }
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// Returns `NaN` when `SS_tot` is zero (all observations identical) or the
/// inputs are empty.
pub fn r_squared(observed: &[f64], fitted: &[f64]) -> f64 {
    if observed.is_empty() || observed.len() != fitted.len() {
        return f64::NAN;
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let ss_tot: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return f64::NAN;
    }
    let ss_res: f64 = observed
        .iter()
        .zip(fitted.iter())
        .map(|(y, f)| (y - f).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}
