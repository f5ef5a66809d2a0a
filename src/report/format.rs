//! Reporting utilities: equations, the summary document, and terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;

use crate::domain::{CleanDataset, Dialect, SeriesFit};
use crate::fit::TrendSet;

/// Coefficient precision used in chart titles.
pub const CHART_PRECISION: usize = 3;

/// Coefficient precision used in the summary document.
pub const SUMMARY_PRECISION: usize = 6;

/// Scientific notation with a signed, two-digit exponent: `1.235e+03`.
pub fn fmt_sci(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let s = format!("{value:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// R² with fixed decimals; an undefined value prints as `NaN`.
pub fn fmt_r2(r2: f64, decimals: usize) -> String {
    if r2.is_nan() {
        "NaN".to_string()
    } else {
        format!("{r2:.decimals$}")
    }
}

fn power_suffix(power: usize) -> String {
    match power {
        0 => String::new(),
        1 => "·n".to_string(),
        2 => "·n²".to_string(),
        3 => "·n³".to_string(),
        p => format!("·n^{p}"),
    }
}

/// Explicit polynomial form, highest power first:
/// `y = 1.000e+00·n² - 2.000e+00·n + 3.000e-01`.
pub fn format_equation(coefficients: &[f64], precision: usize) -> String {
    let degree = coefficients.len().saturating_sub(1);
    let mut out = String::from("y = ");
    for (i, &c) in coefficients.iter().enumerate() {
        let magnitude = fmt_sci(c.abs(), precision);
        if i == 0 {
            if c < 0.0 {
                out.push('-');
            }
        } else if c < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        out.push_str(&magnitude);
        out.push_str(&power_suffix(degree - i));
    }
    out
}

/// Markdown summary of every fit: equation, R² and chart location.
pub fn format_summary_document(fits: &[SeriesFit], input: &Path) -> String {
    let mut out = String::new();
    out.push_str("# Trends (polynomial fit)\n\n");
    let _ = writeln!(out, "- generated: {}", Local::now().to_rfc3339());
    let _ = writeln!(out, "- input: {}", input.display());
    out.push('\n');

    for fit in fits {
        let _ = writeln!(out, "**{}**:\n", fit.name);
        let _ = writeln!(out, "- {}", format_equation(&fit.coefficients, SUMMARY_PRECISION));
        let _ = writeln!(out, "- R² = {}", fmt_r2(fit.r_squared, 6));
        let _ = writeln!(out, "- chart: {}\n", fit.artifact.display());
    }

    out
}

/// Facts about how the input was read, for the run summary header.
#[derive(Debug, Clone)]
pub struct InputSummary<'a> {
    pub path: &'a Path,
    pub dialect: Dialect,
    /// Canonical name of the column used as `n`, and how it was found.
    pub size_source: &'a str,
    pub size_rule: &'a str,
}

/// Format the full run summary (input + dataset + per-series fits).
pub fn format_run_summary(input: &InputSummary<'_>, data: &CleanDataset, trends: &TrendSet) -> String {
    let mut out = String::new();

    out.push_str("=== trendfit - benchmark trend fit ===\n");
    out.push_str(&format_input_header(input, data));

    out.push_str("\nFits:\n");
    out.push_str(
        format!("{:<16} {:>3} {:>10}  {}\n", "series", "deg", "R²", "chart").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<3} {:-<10}  {:-<5}\n", "", "", "", "").trim_end());
    out.push('\n');

    for fit in &trends.fits {
        out.push_str(
            format!(
                "{:<16} {:>3} {:>10}  {}\n",
                truncate(&fit.name, 16),
                fit.degree,
                fmt_r2(fit.r_squared, 6),
                fit.artifact.display()
            )
            .trim_end(),
        );
        out.push('\n');
    }
    for (name, reason) in &trends.skipped {
        out.push_str(&format!("  (skipped {name}) {reason}\n"));
    }

    out
}

/// Header lines shared by `fit` and `clean`.
pub fn format_input_header(input: &InputSummary<'_>, data: &CleanDataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Input: {}", input.path.display());
    let _ = writeln!(
        out,
        "Delimiter: '{}' ({:?})",
        input.dialect.display(),
        input.dialect.source
    );
    let _ = writeln!(out, "Size column: '{}' -> n ({})", input.size_source, input.size_rule);
    let mut columns = vec!["n"];
    columns.extend(data.series_names());
    let _ = writeln!(out, "Columns: {}", columns.join(", "));
    let _ = writeln!(out, "Rows: {} used / {} read", data.len(), data.rows_read);
    out
}

/// Tabular dump of the clean dataset; missing cells print as `-`.
pub fn format_dataset_table(data: &CleanDataset) -> String {
    let mut out = String::new();

    let mut header = format!("{:>12}", "n");
    for s in &data.series {
        let _ = write!(header, " {:>12}", truncate(&s.name, 12));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (row, n) in data.n.iter().enumerate() {
        let mut line = format!("{n:>12}");
        for s in &data.series {
            let cell = s.values[row].map(|v| format!("{v}")).unwrap_or_else(|| "-".to_string());
            let _ = write!(line, " {cell:>12}");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
