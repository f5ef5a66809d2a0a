//! Report emission: one SVG chart per fit plus the equations summary.

pub mod chart;
pub mod format;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::SeriesFit;
use crate::error::TrendError;

pub use chart::render_chart;
pub use format::*;

/// File name of the equations summary inside the output directory.
pub const SUMMARY_FILE: &str = "trend_equations.md";

/// Write every chart and the summary document into `output_dir`.
///
/// Returns the summary path. Any write failure aborts the run.
pub fn emit_report(fits: &[SeriesFit], output_dir: &Path, input: &Path) -> Result<PathBuf, TrendError> {
    fs::create_dir_all(output_dir).map_err(|e| TrendError::io(output_dir, e))?;

    for fit in fits {
        render_chart(fit)?;
        info!("Saved: {}", fit.artifact.display());
    }

    let summary = output_dir.join(SUMMARY_FILE);
    fs::write(&summary, format_summary_document(fits, input)).map_err(|e| TrendError::io(&summary, e))?;
    info!("Saved: {}", summary.display());

    Ok(summary)
}
