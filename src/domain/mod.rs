//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the stage tables (`RawTable` → `NormalizedTable` → `NumericTable` → `CleanDataset`)
//! - fit outputs (`SeriesFit`, `FitsFile`)
//! - run configuration (`TrendConfig`)

pub mod types;

pub use types::*;
