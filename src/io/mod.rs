//! Input/output helpers.
//!
//! - results file discovery (`locate`)
//! - delimiter sniffing (`dialect`)
//! - raw table ingest (`ingest`)
//! - fits JSON read/write (`export`)

pub mod dialect;
pub mod export;
pub mod ingest;
pub mod locate;

pub use dialect::*;
pub use export::*;
pub use ingest::*;
pub use locate::*;
