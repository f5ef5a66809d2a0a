//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - measured points: `o`
//! - fitted curve: `-` line

use crate::domain::SeriesFit;

/// Render a preview of one fitted series.
pub fn render_ascii_plot(fit: &SeriesFit, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let xs = fit.points.iter().chain(fit.curve.iter()).map(|&(x, _)| x);
    let (x_min, x_max) = finite_range(xs).unwrap_or((0.0, 1.0));
    let sampled;
    let curve: &[(f64, f64)] = if fit.curve.is_empty() {
        sampled = sample_curve(fit, x_min, x_max, width);
        &sampled
    } else {
        &fit.curve
    };

    let ys = fit.points.iter().chain(curve.iter()).map(|&(_, y)| y);
    let (y_min, y_max) = finite_range(ys).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    for &(x, y) in &fit.points {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | n=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n",
        fit.name
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Min/max of the finite values; a flat range is widened by one unit.
fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    if hi > lo { Some((lo, hi)) } else { Some((lo - 0.5, hi + 0.5)) }
}

fn sample_curve(fit: &SeriesFit, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    crate::math::linspace(x_min, x_max, n.max(2))
        .into_iter()
        .map(|x| (x, fit.predict(x)))
        .collect()
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(n, y) in curve {
        if !(n.is_finite() && y.is_finite()) {
            continue;
        }
        let x = map_x(n, x_min, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn flat_fit(points: Vec<(f64, f64)>, curve: Vec<(f64, f64)>) -> SeriesFit {
        SeriesFit {
            name: "ijk".to_string(),
            degree: 1,
            coefficients: vec![0.0, 100.0],
            r_squared: 0.0,
            artifact: PathBuf::from("plots/trend_ijk.svg"),
            points,
            curve,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let fit = flat_fit(vec![(1.0, 100.0), (10.0, 110.0)], vec![(1.0, 100.0), (10.0, 100.0)]);

        let txt = render_ascii_plot(&fit, 10, 5);
        let expected = concat!(
            "Plot: ijk | n=[1.000, 10.000] | y=[99.500, 110.500]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn missing_curve_is_sampled_from_coefficients() {
        let fit = flat_fit(vec![(1.0, 100.0), (10.0, 110.0)], Vec::new());
        let txt = render_ascii_plot(&fit, 10, 5);
        let last = txt.lines().last().unwrap();
        assert_eq!(last, "o---------");
    }

    #[test]
    fn tiny_sizes_are_clamped() {
        let fit = flat_fit(vec![(1.0, 1.0)], Vec::new());
        let txt = render_ascii_plot(&fit, 1, 1);
        assert_eq!(txt.lines().count(), 1 + 5);
        assert!(txt.lines().skip(1).all(|l| l.chars().count() == 10));
    }
}
