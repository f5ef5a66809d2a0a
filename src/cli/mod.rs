//! Command-line parsing for the benchmark trend fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the cleaning/fitting code. Every option can also be supplied
//! through a `TRENDFIT_*` environment variable.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "trendfit",
    version,
    about = "Fit polynomial trends to benchmark timing results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean the newest results file, fit every series, write charts and the equations summary.
    Fit(FitArgs),
    /// Print the cleaned dataset only (no fitting, no files written).
    Clean(InputArgs),
    /// Preview fits previously exported with `fit --export-json`.
    Plot(PlotArgs),
}

/// Where to find the results file and how to read it.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Read this file instead of searching for the newest results file.
    #[arg(long, env = "TRENDFIT_INPUT", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Directory the search patterns are evaluated in.
    #[arg(long, env = "TRENDFIT_ROOT", default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Search pattern (repeatable). Defaults to results*.csv, build/results*.csv, **/results*.csv.
    #[arg(
        long = "pattern",
        env = "TRENDFIT_PATTERNS",
        value_delimiter = ',',
        value_name = "GLOB"
    )]
    pub patterns: Vec<String>,

    /// Force the field delimiter (a single character, or `tab`).
    #[arg(long, env = "TRENDFIT_DELIMITER", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Number of leading lines used to detect the delimiter.
    #[arg(long, env = "TRENDFIT_SAMPLE_LINES", default_value_t = 10)]
    pub sample_lines: usize,
}

/// Options for a full fit run.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory charts and the equations summary are written to.
    #[arg(long, env = "TRENDFIT_OUTPUT_DIR", default_value = "plots", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Highest polynomial degree (clamped to 1..=3).
    #[arg(long, env = "TRENDFIT_MAX_DEGREE", default_value_t = 3)]
    pub max_degree: usize,

    /// Points on the smooth curve evaluated for each chart.
    #[arg(long, env = "TRENDFIT_GRID_POINTS", default_value_t = 400)]
    pub grid_points: usize,

    /// Print an ASCII preview of every fit.
    #[arg(long, env = "TRENDFIT_PREVIEW")]
    pub preview: bool,

    /// Preview width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Preview height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,

    /// Also write every fit (coefficients, points, curve) to this JSON file.
    #[arg(long = "export-json", env = "TRENDFIT_EXPORT_JSON", value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

/// Options for previewing saved fits.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Fits JSON file produced by `trendfit fit --export-json`.
    #[arg(long, value_name = "JSON")]
    pub fits: PathBuf,

    /// Only preview this series.
    #[arg(long)]
    pub series: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,
}

/// Parse a delimiter argument: one ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        "space" => return Ok(b' '),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!("expected a single ASCII character or `tab`, got `{raw}`")),
    }
}
