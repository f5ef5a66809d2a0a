//! Turning a raw text table into a clean numeric dataset.
//!
//! `schema` → `cells` → `filter`, each stage consuming the previous table.

pub mod cells;
pub mod filter;
pub mod schema;

pub use cells::*;
pub use filter::*;
pub use schema::*;
