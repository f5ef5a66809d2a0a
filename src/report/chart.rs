//! SVG trend charts, one file per fitted series.
//!
//! Each chart shows the measured points, the smooth fitted curve, and a
//! header with the series name, degree, equation and R².
//!
//! SVG output only needs plotters' naive text layout, so rendering works
//! without system fonts.

use std::error::Error;
use std::ops::Range;

use plotters::prelude::*;

use crate::domain::SeriesFit;
use crate::error::TrendError;
use crate::report::format::{CHART_PRECISION, fmt_r2, fmt_sci, format_equation};

/// Canvas size in pixels.
pub const CHART_SIZE: (u32, u32) = (960, 720);

const HEADER_HEIGHT: u32 = 90;

/// Render `fit` to its artifact path.
pub fn render_chart(fit: &SeriesFit) -> Result<(), TrendError> {
    draw(fit).map_err(|e| TrendError::Render {
        path: fit.artifact.clone(),
        message: e.to_string(),
    })
}

fn draw(fit: &SeriesFit) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(&fit.artifact, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (header, body) = root.split_vertically(HEADER_HEIGHT);

    let title = TextStyle::from(("sans-serif", 24).into_font()).color(&BLACK);
    let detail = TextStyle::from(("sans-serif", 16).into_font()).color(&BLACK);
    header.draw_text(&format!("{} (degree {})", fit.name, fit.degree), &title, (20, 10))?;
    header.draw_text(&format_equation(&fit.coefficients, CHART_PRECISION), &detail, (20, 44))?;
    header.draw_text(&format!("R² = {}", fmt_r2(fit.r_squared, 4)), &detail, (20, 66))?;

    let xs = fit.points.iter().chain(fit.curve.iter()).map(|&(x, _)| x);
    let ys = fit.points.iter().chain(fit.curve.iter()).map(|&(_, y)| y);
    let x_range = padded_range(xs);
    let y_range = padded_range(ys);

    let mut chart = ChartBuilder::on(&body)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("n")
        .y_desc("t, s")
        .label_style(("sans-serif", 13))
        .y_label_formatter(&|v| fmt_sci(*v, 2))
        .draw()?;

    let curve_style = RED.stroke_width(2);
    chart
        .draw_series(LineSeries::new(fit.curve.iter().copied(), curve_style))?
        .label(format!("fit (degree {})", fit.degree))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], curve_style));

    chart
        .draw_series(fit.points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?
        .label("measured")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Min..max of `values` with 5% headroom; a flat range is widened so the
/// chart still has an extent.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span <= 0.0 {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad)..(hi + pad);
    }
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}
