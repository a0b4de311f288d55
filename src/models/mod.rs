//! Growth-curve model implementation.
//!
//! The model is implemented as small, pure functions so that the optimizer
//! can stay generic over the residual vector.

pub mod model;

pub use model::*;
