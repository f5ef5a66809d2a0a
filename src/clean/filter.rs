//! Row validity filter.
//!
//! A row survives when it has a size value and at least one measurement.
//! Survivors keep their input order.

use tracing::info;

use crate::domain::{CleanDataset, NumericTable, Series};
use crate::error::TrendError;

/// Drop invalid rows and split the table into the size axis and series.
pub fn filter_rows(table: NumericTable) -> Result<CleanDataset, TrendError> {
    let rows_read = table.rows.len();
    let series_idx: Vec<usize> = table.series_indices().collect();

    let mut n = Vec::with_capacity(rows_read);
    let mut series: Vec<Series> = series_idx
        .iter()
        .map(|&i| Series {
            name: table.columns[i].clone(),
            values: Vec::with_capacity(rows_read),
        })
        .collect();

    for row in &table.rows {
        let Some(size) = row[table.size_index] else {
            continue;
        };
        if series_idx.iter().all(|&i| row[i].is_none()) {
            continue;
        }
        n.push(size);
        for (s, &i) in series.iter_mut().zip(series_idx.iter()) {
            s.values.push(row[i]);
        }
    }

    info!("rows after cleaning: {} (of {rows_read})", n.len());
    if n.is_empty() {
        return Err(TrendError::EmptyDataset { rows_read });
    }

    Ok(CleanDataset {
        n,
        series,
        rows_read,
    })
}
