//! Mathematical utilities: peak primitives on a 1D signal and the
//! nonlinear least squares machinery used by the fitter.

pub mod lm;
pub mod ols;
pub mod peaks;

pub use lm::*;
pub use ols::*;
pub use peaks::*;
