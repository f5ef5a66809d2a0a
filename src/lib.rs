//! `trendfit` library crate.
//!
//! The binary (`trendfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - each pipeline stage (locate, sniff, clean, fit, report) can be driven on its own

pub mod app;
pub mod clean;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
