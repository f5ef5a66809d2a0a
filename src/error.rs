//! Error types.
//!
//! `TrendError` is the domain taxonomy produced by the pipeline stages.
//! `AppError` is what the binary sees: a message plus a process exit code.

use std::path::PathBuf;

/// Failures raised by the CLEAN → FIT → REPORT pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TrendError {
    /// None of the search patterns matched a file.
    #[error("No results file found (searched: {}). Run the benchmark first.", patterns.join(", "))]
    NoInputFound { patterns: Vec<String> },

    /// No column could be identified as the size axis `n`.
    #[error("Could not find a size column among: [{}]", columns.join(", "))]
    NoSizeColumn { columns: Vec<String> },

    /// The table has a size column but nothing to fit against it.
    #[error("No measurement columns found besides the size column `n`.")]
    NoSeriesColumns,

    /// Every row was dropped by cleaning/filtering.
    #[error("No usable rows remain after cleaning ({rows_read} rows read).")]
    EmptyDataset { rows_read: usize },

    /// Fewer than two valid `(n, value)` points for a series.
    #[error("Not enough points for `{series}` (len={count}).")]
    InsufficientSeriesData { series: String, count: usize },

    /// The least-squares system could not be solved to finite coefficients.
    #[error("Least-squares solve failed for `{series}`.")]
    DegenerateFit { series: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to render chart '{}': {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("Invalid fits JSON '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TrendError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only affects a single series.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientSeriesData { .. } | Self::DegenerateFit { .. }
        )
    }

    /// Process exit code used when the error aborts the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoInputFound { .. }
            | Self::NoSizeColumn { .. }
            | Self::NoSeriesColumns
            | Self::Io { .. }
            | Self::Csv { .. }
            | Self::Json { .. } => 2,
            Self::EmptyDataset { .. } => 3,
            Self::InsufficientSeriesData { .. } | Self::DegenerateFit { .. } | Self::Render { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<TrendError> for AppError {
    fn from(err: TrendError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
