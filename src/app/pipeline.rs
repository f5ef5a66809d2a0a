//! Shared pipeline logic used by the `fit` and `clean` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! locate -> sniff -> read -> normalize -> clean cells -> filter rows -> fit -> report
//!
//! The command handlers can then focus on presentation.

use std::path::PathBuf;

use tracing::info;

use crate::clean::{clean_table, filter_rows, normalize_schema};
use crate::domain::{CleanDataset, Dialect, SizeRule, TrendConfig};
use crate::error::TrendError;
use crate::fit::{FitOptions, TrendSet, fit_trends};
use crate::io::dialect::{leading_lines, resolve_dialect};
use crate::io::ingest::{parse_raw_table, read_input_text};
use crate::io::locate::locate_input;
use crate::report::{InputSummary, emit_report};

/// Everything known after the CLEAN stage.
#[derive(Debug, Clone)]
pub struct CleanRun {
    pub input: PathBuf,
    pub dialect: Dialect,
    /// Canonical name of the column that became `n`.
    pub size_source: String,
    pub size_rule: SizeRule,
    pub dataset: CleanDataset,
}

impl CleanRun {
    pub fn input_summary(&self) -> InputSummary<'_> {
        InputSummary {
            path: &self.input,
            dialect: self.dialect,
            size_source: &self.size_source,
            size_rule: self.size_rule.describe(),
        }
    }
}

/// All computed outputs of a single `trendfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub clean: CleanRun,
    pub trends: TrendSet,
    pub summary_path: PathBuf,
}

/// Resolve the input file, read it and clean it into a dataset.
pub fn run_clean(config: &TrendConfig) -> Result<CleanRun, TrendError> {
    // 1) Find the input.
    let input = match &config.input {
        Some(path) => {
            info!("Using input: {}", path.display());
            path.clone()
        }
        None => locate_input(&config.root, &config.patterns)?.path,
    };

    // 2) Detect the delimiter on the leading lines.
    let text = read_input_text(&input)?;
    let sample = leading_lines(&text, config.sample_lines.max(1));
    let dialect = resolve_dialect(&sample, config.delimiter);

    // 3) Parse and clean.
    let raw = parse_raw_table(&text, dialect.delimiter, &input)?;
    info!(rows = raw.rows.len(), "rows read");

    let normalized = normalize_schema(raw)?;
    let size_source = normalized.size_source.clone();
    let size_rule = normalized.size_rule;

    let dataset = filter_rows(clean_table(normalized))?;

    Ok(CleanRun {
        input,
        dialect,
        size_source,
        size_rule,
        dataset,
    })
}

/// Execute the full CLEAN -> FIT -> REPORT pipeline.
pub fn run_fit(config: &TrendConfig) -> Result<RunOutput, TrendError> {
    let clean = run_clean(config)?;

    let opts = FitOptions::from_config(config);
    let trends = fit_trends(&clean.dataset, &config.output_dir, &opts);
    info!(
        fitted = trends.fits.len(),
        skipped = trends.skipped.len(),
        "fitting finished"
    );

    let summary_path = emit_report(&trends.fits, &config.output_dir, &clean.input)?;

    Ok(RunOutput {
        clean,
        trends,
        summary_path,
    })
}
