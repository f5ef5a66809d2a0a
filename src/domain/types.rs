//! Shared domain types.
//!
//! Each pipeline stage consumes one of these tables by value and produces the
//! next one; nothing holds references into an earlier stage's data.
//!
//! - `RawTable`: header + string cells, exactly as read
//! - `NormalizedTable`: canonical column names, size column identified
//! - `NumericTable`: every cell coerced to `Option<f64>`
//! - `CleanDataset`: rows filtered, split into the size axis and series
//! - `SeriesFit`: one fitted polynomial trend

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical name of the size (independent variable) column.
pub const SIZE_COLUMN: &str = "n";

/// Name of the synthetic row-wise average series.
pub const AVERAGE_SERIES: &str = "average";

/// Default search patterns for the results file, evaluated in order.
pub const DEFAULT_PATTERNS: [&str; 3] = ["results*.csv", "build/results*.csv", "**/results*.csv"];

/// Delimiter used when the sniffer cannot decide.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Delimiters the sniffer is allowed to choose from.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b';', b',', b' ', b'\t'];

/// Header plus string cells, as read from the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, padding short rows with empty cells and dropping extra
    /// cells so every row has exactly `headers.len()` entries.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }
}

/// Which schema rule identified the size column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// A column already named `n`.
    Exact,
    /// A well-known alias (`size`, `dim`, `nn`).
    Alias,
    /// Name starts with `n` or contains `size`.
    Fallback,
}

impl SizeRule {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Exact => "exact `n`",
            Self::Alias => "alias (size/dim/nn)",
            Self::Fallback => "prefix `n` / contains `size`",
        }
    }
}

/// `RawTable` with canonical column names and the size column renamed to `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// Canonical names, left to right; `columns[size_index] == "n"`.
    pub columns: Vec<String>,
    pub size_index: usize,
    pub size_rule: SizeRule,
    /// Canonical name of the size column before it was renamed.
    pub size_source: String,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    /// Indices of the measurement columns, in original order.
    pub fn series_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns.len()).filter(move |&i| i != self.size_index)
    }
}

/// `NormalizedTable` with every cell coerced to a number or missing.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    pub columns: Vec<String>,
    pub size_index: usize,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl NumericTable {
    pub fn series_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns.len()).filter(move |&i| i != self.size_index)
    }
}

/// One measurement column aligned with `CleanDataset::n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// The `(n, value)` pairs where the value is present.
    pub fn points(&self, n: &[f64]) -> Vec<(f64, f64)> {
        n.iter()
            .zip(self.values.iter())
            .filter_map(|(&x, v)| v.map(|y| (x, y)))
            .collect()
    }
}

/// Filtered numeric data ready for fitting.
///
/// Every row has a size value and at least one measurement; row order is the
/// input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanDataset {
    pub n: Vec<f64>,
    pub series: Vec<Series>,
    /// Data rows read from the file (before filtering).
    pub rows_read: usize,
}

impl CleanDataset {
    pub fn len(&self) -> usize {
        self.n.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n.is_empty()
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A fitted polynomial trend for one series.
///
/// Produced once by the fitter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFit {
    pub name: String,
    pub degree: usize,
    /// Highest degree first, constant term last.
    pub coefficients: Vec<f64>,
    /// `NaN` when the observed values have zero variance.
    #[serde(with = "nan_as_null")]
    pub r_squared: f64,
    pub artifact: PathBuf,
    /// Observed `(n, value)` pairs used for the fit.
    pub points: Vec<(f64, f64)>,
    /// Dense evaluation grid over `[min(n), max(n)]`.
    pub curve: Vec<(f64, f64)>,
}

impl SeriesFit {
    /// Evaluate the fitted polynomial at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        crate::math::polyval(&self.coefficients, x)
    }

    /// Fitted values at the observed `n`.
    pub fn fitted(&self) -> Vec<f64> {
        self.points.iter().map(|&(x, _)| self.predict(x)).collect()
    }
}

/// JSON has no `NaN`; an undefined R² is stored as `null`.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            s.serialize_f64(*value)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}

/// Where the delimiter for a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterSource {
    Sniffed,
    Defaulted,
    Forced,
}

/// Resolved field delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub source: DelimiterSource,
}

impl Dialect {
    /// Printable form of the delimiter (`\t` for tab).
    pub fn display(&self) -> String {
        match self.delimiter {
            b'\t' => "\\t".to_string(),
            b => (b as char).to_string(),
        }
    }
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    /// Explicit input file; bypasses the locator when set.
    pub input: Option<PathBuf>,
    /// Directory the search patterns are evaluated in.
    pub root: PathBuf,
    pub patterns: Vec<String>,
    /// Forced delimiter; bypasses the sniffer when set.
    pub delimiter: Option<u8>,
    pub sample_lines: usize,
    pub output_dir: PathBuf,
    pub max_degree: usize,
    pub grid_points: usize,
    pub preview: bool,
    pub preview_width: usize,
    pub preview_height: usize,
    pub export_json: Option<PathBuf>,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            input: None,
            root: PathBuf::from("."),
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            delimiter: None,
            sample_lines: 10,
            output_dir: PathBuf::from("plots"),
            max_degree: 3,
            grid_points: 400,
            preview: false,
            preview_width: 72,
            preview_height: 18,
            export_json: None,
        }
    }
}

/// JSON export of a run's fits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitsFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub input: PathBuf,
    pub fits: Vec<SeriesFit>,
}
