//! Growth-curve fitting.
//!
//! Responsibilities:
//!
//! - fit the logistic model to one extracted peak
//! - fan the per-peak fits out over a worker pool, keeping failures per peak

pub mod batch;
pub mod fitter;

pub use batch::*;
pub use fitter::*;
