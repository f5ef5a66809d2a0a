//! Fit every series of a dataset, then the synthetic average series.
//!
//! Series are independent: one that cannot be fit is recorded as skipped and
//! the rest carry on. The average is the row-wise mean of the series that
//! were fit successfully; skipped series never contribute to it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::{AVERAGE_SERIES, CleanDataset, Series, SeriesFit};
use crate::error::TrendError;
use crate::fit::fitter::{FitOptions, fit_series};

/// Output of fitting a whole dataset.
#[derive(Debug, Clone)]
pub struct TrendSet {
    /// Successful fits in column order, the average last.
    pub fits: Vec<SeriesFit>,
    /// Series that were skipped and why (for diagnostics).
    pub skipped: Vec<(String, String)>,
}

/// File-name stem for a series chart (`trend_<stem>.svg`).
///
/// Characters outside `[a-z0-9_-]` become `_`; an empty name falls back to
/// `series<idx>`.
fn artifact_stem(name: &str, idx: usize) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() { format!("series{idx}") } else { stem }
}

/// Artifact file name not yet in `used`; clashes get a `_2`, `_3`, ... suffix.
fn claim_artifact(used: &mut HashSet<String>, name: &str, idx: usize) -> String {
    let stem = artifact_stem(name, idx);
    let mut file = format!("trend_{stem}.svg");
    let mut k = 2;
    while used.contains(&file) {
        file = format!("trend_{stem}_{k}.svg");
        k += 1;
    }
    used.insert(file.clone());
    file
}

/// Fit each series of `data`, then the average of the fitted ones.
pub fn fit_trends(data: &CleanDataset, output_dir: &Path, opts: &FitOptions) -> TrendSet {
    let mut fits = Vec::with_capacity(data.series.len() + 1);
    let mut skipped = Vec::new();
    let mut fitted_idx = Vec::with_capacity(data.series.len());
    let mut used = HashSet::new();

    for (idx, series) in data.series.iter().enumerate() {
        let artifact = output_dir.join(claim_artifact(&mut used, &series.name, idx));
        match try_fit(series, &data.n, artifact, opts) {
            Ok(fit) => {
                fitted_idx.push(idx);
                fits.push(fit);
            }
            Err(e) => skip(&mut skipped, &series.name, e),
        }
    }

    if !fitted_idx.is_empty() {
        let average = row_average(data, &fitted_idx);
        let artifact = output_dir.join(claim_artifact(&mut used, AVERAGE_SERIES, data.series.len()));
        match try_fit(&average, &data.n, artifact, opts) {
            Ok(fit) => fits.push(fit),
            Err(e) => skip(&mut skipped, AVERAGE_SERIES, e),
        }
    }

    TrendSet { fits, skipped }
}

/// Row-wise mean over the columns at `columns`, ignoring missing cells.
///
/// A row where all of those columns are missing stays missing.
pub fn row_average(data: &CleanDataset, columns: &[usize]) -> Series {
    let values = (0..data.len())
        .map(|row| {
            let present: Vec<f64> = columns
                .iter()
                .filter_map(|&c| data.series[c].values[row])
                .collect();
            if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        })
        .collect();

    Series {
        name: AVERAGE_SERIES.to_string(),
        values,
    }
}

fn try_fit(series: &Series, n: &[f64], artifact: PathBuf, opts: &FitOptions) -> Result<SeriesFit, TrendError> {
    fit_series(&series.name, &series.points(n), artifact, opts)
}

fn skip(skipped: &mut Vec<(String, String)>, name: &str, err: TrendError) {
    debug_assert!(err.is_recoverable(), "{err}");
    warn!("{err} Skipping.");
    skipped.push((name.to_string(), err.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: Vec<f64>, series: Vec<(&str, Vec<Option<f64>>)>) -> CleanDataset {
        CleanDataset {
            rows_read: n.len(),
            n,
            series: series
                .into_iter()
                .map(|(name, values)| Series {
                    name: name.to_string(),
                    values,
                })
                .collect(),
        }
    }

    #[test]
    fn artifact_names_are_filesystem_safe() {
        assert_eq!(artifact_stem("ijk", 0), "ijk");
        assert_eq!(artifact_stem("t(ms)/run", 1), "t_ms__run");
        assert_eq!(artifact_stem("", 2), "series2");
        assert_eq!(artifact_stem(AVERAGE_SERIES, 3), "average");
    }

    #[test]
    fn artifact_paths_never_collide() {
        let data = dataset(
            vec![1.0, 2.0, 3.0],
            vec![
                ("average", vec![Some(1.0), Some(2.0), Some(3.0)]),
                ("t(ms)", vec![Some(2.0), Some(4.0), Some(5.0)]),
                ("t[ms]", vec![Some(3.0), Some(5.0), Some(8.0)]),
            ],
        );

        let set = fit_trends(&data, Path::new("plots"), &FitOptions::default());
        let paths: Vec<PathBuf> = set.fits.iter().map(|f| f.artifact.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("plots/trend_average.svg"),
                PathBuf::from("plots/trend_t_ms_.svg"),
                PathBuf::from("plots/trend_t_ms__2.svg"),
                PathBuf::from("plots/trend_average_2.svg"),
            ]
        );
    }

    #[test]
    fn sparse_series_is_skipped_and_excluded_from_average() {
        let data = dataset(
            vec![10.0, 20.0, 40.0],
            vec![
                ("a", vec![Some(1.0), Some(2.0), Some(4.0)]),
                ("b", vec![Some(100.0), None, None]),
            ],
        );

        let set = fit_trends(&data, Path::new("plots"), &FitOptions::default());

        let names: Vec<&str> = set.fits.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", AVERAGE_SERIES]);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].0, "b");

        // The average equals `a` alone; `b`'s lone 100.0 must not leak in.
        let avg = &set.fits[1];
        assert_eq!(avg.points, vec![(10.0, 1.0), (20.0, 2.0), (40.0, 4.0)]);
        assert_eq!(avg.artifact, PathBuf::from("plots/trend_average.svg"));
    }

    #[test]
    fn average_ignores_missing_cells_row_by_row() {
        let data = dataset(
            vec![1.0, 2.0, 3.0],
            vec![
                ("a", vec![Some(2.0), None, Some(6.0)]),
                ("b", vec![Some(4.0), Some(8.0), None]),
            ],
        );
        let avg = row_average(&data, &[0, 1]);
        assert_eq!(avg.values, vec![Some(3.0), Some(8.0), Some(6.0)]);

        let only_a = row_average(&data, &[0]);
        assert_eq!(only_a.values, vec![Some(2.0), None, Some(6.0)]);
    }

    #[test]
    fn nothing_fit_means_no_average() {
        let data = dataset(vec![1.0, 2.0], vec![("a", vec![Some(1.0), None])]);
        let set = fit_trends(&data, Path::new("plots"), &FitOptions::default());
        assert!(set.fits.is_empty());
        assert_eq!(set.skipped.len(), 1);
    }
}
