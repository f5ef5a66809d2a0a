//! Terminal previews of fitted trends.

pub mod ascii;

pub use ascii::render_ascii_plot;
