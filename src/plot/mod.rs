//! Plotting: deterministic ASCII charts for the terminal and SVG files.

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
