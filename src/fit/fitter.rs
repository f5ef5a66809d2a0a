//! Adaptive-degree polynomial fit for a single series.
//!
//! Given the valid `(n, value)` pairs of one series we:
//! - pick the degree from the point count (`min(max, count - 1)`, at least 1)
//! - solve the OLS problem on a Vandermonde design matrix
//! - score the fit with R²
//! - evaluate the polynomial on a dense grid for smooth plotting
//!
//! Failures here only ever concern one series; callers log and skip them.

use std::path::PathBuf;

use nalgebra::DVector;
use tracing::debug;

use crate::domain::{SeriesFit, TrendConfig};
use crate::error::TrendError;
use crate::math::{linspace, polyval, r_squared, solve_least_squares, vandermonde};

/// Highest degree the fitter will ever use.
pub const MAX_DEGREE: usize = 3;

/// Fitting options shared by every series of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    /// Degree cap, clamped to `1..=MAX_DEGREE`.
    pub max_degree: usize,
    /// Number of points on the smooth evaluation grid.
    pub grid_points: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_degree: MAX_DEGREE,
            grid_points: 400,
        }
    }
}

impl FitOptions {
    pub fn from_config(config: &TrendConfig) -> Self {
        Self {
            max_degree: config.max_degree.clamp(1, MAX_DEGREE),
            grid_points: config.grid_points.max(2),
        }
    }
}

/// Regression degree for `count` valid points: linear for two points, up to
/// `max_degree` once there are enough points to determine it.
pub fn choose_degree(count: usize, max_degree: usize) -> usize {
    count
        .saturating_sub(1)
        .max(1)
        .min(max_degree.clamp(1, MAX_DEGREE))
}

/// Fit one series. `artifact` is where its chart will be written.
pub fn fit_series(
    name: &str,
    points: &[(f64, f64)],
    artifact: PathBuf,
    opts: &FitOptions,
) -> Result<SeriesFit, TrendError> {
    if points.len() < 2 {
        return Err(TrendError::InsufficientSeriesData {
            series: name.to_string(),
            count: points.len(),
        });
    }

    let degree = choose_degree(points.len(), opts.max_degree);
    let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();

    let design = vandermonde(&xs, degree);
    let target = DVector::from_column_slice(&ys);
    let beta = solve_least_squares(&design, &target).ok_or_else(|| TrendError::DegenerateFit {
        series: name.to_string(),
    })?;
    let coefficients: Vec<f64> = beta.iter().copied().collect();

    let fitted: Vec<f64> = xs.iter().map(|&x| polyval(&coefficients, x)).collect();
    let r2 = r_squared(&ys, &fitted);

    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let curve = linspace(x_min, x_max, opts.grid_points)
        .into_iter()
        .map(|x| (x, polyval(&coefficients, x)))
        .collect();

    debug!(series = name, degree, r2, points = points.len(), "fitted series");

    Ok(SeriesFit {
        name: name.to_string(),
        degree,
        coefficients,
        r_squared: r2,
        artifact,
        points: points.to_vec(),
        curve,
    })
}
