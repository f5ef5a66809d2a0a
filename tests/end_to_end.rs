use std::fs;
use std::path::Path;

use trendfit::app::pipeline::{run_clean, run_fit};
use trendfit::domain::{AVERAGE_SERIES, DelimiterSource, SizeRule, TrendConfig};
use trendfit::error::{AppError, TrendError};
use trendfit::io::export::{read_fits_json, write_fits_json};
use trendfit::report::SUMMARY_FILE;

fn config_for(root: &Path) -> TrendConfig {
    TrendConfig {
        root: root.to_path_buf(),
        output_dir: root.join("plots"),
        ..TrendConfig::default()
    }
}

#[test]
fn bubble_and_merge_produce_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("build")).unwrap();
    fs::write(
        dir.path().join("build/results.csv"),
        "n;bubble;merge\n10;0.5;0.1\n20;2.0;0.2\n40;8.0;0.4\n80;32.0;0.8\n",
    )
    .unwrap();

    let run = run_fit(&config_for(dir.path())).unwrap();

    assert_eq!(run.clean.dialect.delimiter, b';');
    assert_eq!(run.clean.dialect.source, DelimiterSource::Sniffed);
    assert_eq!(run.clean.dataset.len(), 4);
    assert!(run.trends.skipped.is_empty());

    let names: Vec<&str> = run.trends.fits.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["bubble", "merge", AVERAGE_SERIES]);

    let bubble = &run.trends.fits[0];
    assert_eq!(bubble.degree, 3);
    assert!((bubble.r_squared - 1.0).abs() < 1e-9);

    let merge = &run.trends.fits[1];
    assert!((merge.r_squared - 1.0).abs() < 1e-9);
    for &(n, _) in &merge.points {
        assert!((merge.predict(n) - 0.01 * n).abs() < 1e-9);
    }
    // Linear-like: the curve's midpoint sits on the chord.
    assert!((merge.predict(50.0) - 0.5).abs() < 1e-6);

    let plots = dir.path().join("plots");
    for file in ["trend_bubble.svg", "trend_merge.svg", "trend_average.svg"] {
        assert!(plots.join(file).is_file(), "missing {file}");
    }

    assert_eq!(run.summary_path, plots.join(SUMMARY_FILE));
    let summary = fs::read_to_string(&run.summary_path).unwrap();
    assert_eq!(summary.matches("- chart: ").count(), 3);
    assert!(summary.contains("**average**"));
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_fit(&config_for(dir.path())).unwrap_err();
    assert!(matches!(err, TrendError::NoInputFound { .. }));
    assert_eq!(AppError::from(err).exit_code(), 2);
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn no_usable_rows_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("results.csv"), "n;a\nx;1\n10;-\n").unwrap();

    let err = run_fit(&config_for(dir.path())).unwrap_err();
    assert!(matches!(err, TrendError::EmptyDataset { rows_read: 2 }));
    assert_eq!(AppError::from(err).exit_code(), 3);
}

#[test]
fn dim_column_becomes_n() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "Dim,ijk,ikj\n100,1.0,0.9\n200,8.0,7.1\n300,27.0,24.2\n",
    )
    .unwrap();

    let run = run_clean(&config_for(dir.path())).unwrap();
    assert_eq!(run.dialect.delimiter, b',');
    assert_eq!(run.size_source, "dim");
    assert_ne!(run.size_rule, SizeRule::Exact);
    assert_eq!(run.dataset.n, vec![100.0, 200.0, 300.0]);
    assert_eq!(run.dataset.series_names(), vec!["ijk", "ikj"]);
}

#[test]
fn decimal_commas_and_units_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("results_2024.csv"),
        "\u{feff}Size ;I, J, K;naive\n10;0,5s;1,5s\n20;n/a;3,0s\n;9;9\n40;2,0s;\n",
    )
    .unwrap();

    let run = run_clean(&config_for(dir.path())).unwrap();
    let data = &run.dataset;
    assert_eq!(data.rows_read, 4);
    assert_eq!(data.n, vec![10.0, 20.0, 40.0]);
    assert_eq!(data.series_names(), vec!["ijk", "naive"]);
    assert_eq!(data.series[0].values, vec![Some(0.5), None, Some(2.0)]);
    assert_eq!(data.series[1].values, vec![Some(1.5), Some(3.0), None]);
}

#[test]
fn sparse_series_is_skipped_but_run_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "n;dense;sparse\n1;1.0;\n2;2.1;5.0\n3;2.9;\n4;4.2;\n",
    )
    .unwrap();

    let run = run_fit(&config_for(dir.path())).unwrap();
    let names: Vec<&str> = run.trends.fits.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["dense", AVERAGE_SERIES]);
    assert_eq!(run.trends.skipped.len(), 1);
    assert_eq!(run.trends.skipped[0].0, "sparse");

    // The average only sees `dense`.
    let avg = &run.trends.fits[1];
    assert_eq!(avg.points[1], (2.0, 2.1));
    assert!(!dir.path().join("plots/trend_sparse.svg").exists());
}

#[test]
fn forced_delimiter_and_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.tsv");
    fs::write(&input, "n\tt\n1\t2\n2\t4\n3\t6\n").unwrap();

    let config = TrendConfig {
        input: Some(input.clone()),
        delimiter: Some(b'\t'),
        ..config_for(dir.path())
    };
    let run = run_fit(&config).unwrap();
    assert_eq!(run.clean.dialect.source, DelimiterSource::Forced);

    let json = dir.path().join("out/fits.json");
    write_fits_json(&json, &run.clean.input, &run.trends.fits).unwrap();
    let back = read_fits_json(&json).unwrap();
    assert_eq!(back.input, input);
    assert_eq!(back.fits.len(), run.trends.fits.len());
    assert_eq!(back.fits[0].name, "t");
    assert_eq!(back.fits[0].curve.len(), 400);
}

#[test]
fn quoted_comma_headers_read_as_comma_separated() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "n,\"I, J, K\",\"K, I, J\"\n10,1.5,2\n20,3,4\n40,6,8\n",
    )
    .unwrap();

    let run = run_clean(&config_for(dir.path())).unwrap();
    assert_eq!(run.dialect.delimiter, b',');
    assert_eq!(run.dialect.source, DelimiterSource::Sniffed);
    assert_eq!(run.dataset.series_names(), vec!["ijk", "kij"]);
    assert_eq!(run.dataset.n, vec![10.0, 20.0, 40.0]);
}

#[test]
fn average_named_column_gets_its_own_chart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "n;bubble;average\n10;0.5;0.1\n20;2.0;0.2\n40;8.0;0.4\n80;32.0;0.8\n",
    )
    .unwrap();

    let run = run_fit(&config_for(dir.path())).unwrap();
    assert_eq!(run.trends.fits.len(), 3);

    let mut paths: Vec<_> = run.trends.fits.iter().map(|f| f.artifact.clone()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        assert!(path.is_file(), "missing {}", path.display());
    }
}
