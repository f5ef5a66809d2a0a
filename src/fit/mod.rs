//! Trend fitting.
//!
//! Responsibilities:
//!
//! - fit one series with an adaptive-degree polynomial (`fitter`)
//! - fit all series plus the synthetic average, skipping what cannot be fit (`trend`)

pub mod fitter;
pub mod trend;

pub use fitter::*;
pub use trend::*;
