//! Read/write fits JSON files.
//!
//! Fits JSON is the portable representation of a run:
//! - each series' degree, full-precision coefficients and R²
//! - the observed points and the dense fitted curve (for re-plotting)
//!
//! The schema is defined by `domain::FitsFile`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitsFile, SeriesFit};
use crate::error::TrendError;

/// Write all fits of a run to `path`.
pub fn write_fits_json(path: &Path, input: &Path, fits: &[SeriesFit]) -> Result<(), TrendError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TrendError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| TrendError::io(path, e))?;

    let doc = FitsFile {
        tool: "trendfit".to_string(),
        generated: Utc::now(),
        input: input.to_path_buf(),
        fits: fits.to_vec(),
    };

    serde_json::to_writer_pretty(BufWriter::new(file), &doc).map_err(|source| TrendError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a fits JSON file.
pub fn read_fits_json(path: &Path) -> Result<FitsFile, TrendError> {
    let file = File::open(path).map_err(|e| TrendError::io(path, e))?;
    serde_json::from_reader(file).map_err(|source| TrendError::Json {
        path: path.to_path_buf(),
        source,
    })
}
