//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the clean/fit pipeline
//! - prints summaries and previews
//! - writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Command, FitArgs, InputArgs, PlotArgs};
use crate::domain::{DEFAULT_PATTERNS, TrendConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `trendfit` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();
    init_logging();

    // `trendfit` and `trendfit --preview` behave like `trendfit fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(&args),
        Command::Clean(args) => handle_clean(&args),
        Command::Plot(args) => handle_plot(&args),
    }
}

fn init_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = config_from_fit_args(args);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.clean.input_summary(), &run.clean.dataset, &run.trends)
    );
    println!("Summary: {}", run.summary_path.display());

    if config.preview {
        for fit in &run.trends.fits {
            println!(
                "{}",
                crate::plot::render_ascii_plot(fit, config.preview_width, config.preview_height)
            );
        }
    }

    if let Some(path) = &config.export_json {
        crate::io::export::write_fits_json(path, &run.clean.input, &run.trends.fits)?;
        info!("Saved: {}", path.display());
    }

    Ok(())
}

fn handle_clean(args: &InputArgs) -> Result<(), AppError> {
    let mut config = TrendConfig::default();
    apply_input_args(&mut config, args);
    let run = pipeline::run_clean(&config)?;

    print!(
        "{}",
        crate::report::format_input_header(&run.input_summary(), &run.dataset)
    );
    println!();
    print!("{}", crate::report::format_dataset_table(&run.dataset));
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let file = crate::io::export::read_fits_json(&args.fits)?;

    let selected: Vec<_> = file
        .fits
        .iter()
        .filter(|f| args.series.as_deref().is_none_or(|s| f.name == s))
        .collect();
    if selected.is_empty() {
        let wanted = args.series.as_deref().unwrap_or("<any>");
        return Err(AppError::new(
            2,
            format!("No series `{wanted}` in '{}'.", args.fits.display()),
        ));
    }

    println!("Fits from {} (input: {})", args.fits.display(), file.input.display());
    for fit in selected {
        println!(
            "{}",
            crate::report::format_equation(&fit.coefficients, crate::report::SUMMARY_PRECISION)
        );
        println!("{}", crate::plot::render_ascii_plot(fit, args.width, args.height));
    }
    Ok(())
}

pub fn config_from_fit_args(args: &FitArgs) -> TrendConfig {
    let mut config = TrendConfig {
        output_dir: args.output_dir.clone(),
        max_degree: args.max_degree,
        grid_points: args.grid_points,
        preview: args.preview,
        preview_width: args.width,
        preview_height: args.height,
        export_json: args.export_json.clone(),
        ..TrendConfig::default()
    };
    apply_input_args(&mut config, &args.input);
    config
}

fn apply_input_args(config: &mut TrendConfig, args: &InputArgs) {
    config.input = args.input.clone();
    config.root = args.root.clone();
    config.patterns = if args.patterns.is_empty() {
        DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
    } else {
        args.patterns.clone()
    };
    config.delimiter = args.delimiter;
    config.sample_lines = args.sample_lines;
}

/// Rewrite argv so `trendfit` defaults to `trendfit fit`.
///
/// Rules:
/// - `trendfit`                      -> `trendfit fit`
/// - `trendfit --preview ...`        -> `trendfit fit --preview ...`
/// - `trendfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "clean" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
