//! Read the results file into a `RawTable`.
//!
//! Everything is kept as text here; numeric coercion happens in `clean`.
//! - invalid UTF-8 is replaced rather than rejected
//! - a leading BOM is stripped from the first header
//! - ragged rows are padded/truncated to the header width

use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::RawTable;
use crate::error::TrendError;

/// Read the whole file as text (lossy UTF-8).
pub fn read_input_text(path: &Path) -> Result<String, TrendError> {
    let bytes = std::fs::read(path).map_err(|e| TrendError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Parse delimited text into a `RawTable`. `path` is only used for errors.
pub fn parse_raw_table(text: &str, delimiter: u8, path: &Path) -> Result<RawTable, TrendError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| TrendError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    let mut bad_records = 0usize;
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => rows.push(record_cells(&record)),
            Err(e) => {
                // +2: header line + 1-based line numbers.
                debug!(line = idx + 2, "skipping unreadable record: {e}");
                bad_records += 1;
            }
        }
    }
    if bad_records > 0 {
        warn!("skipped {bad_records} unreadable record(s) in {}", path.display());
    }

    Ok(RawTable::new(headers, rows))
}

fn record_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}
