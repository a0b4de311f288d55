//! Peak segmentation and extraction.
//!
//! - `segment`: `m` channel -> `PeakSpan`s
//! - `extract`: `Series` + spans -> owned `ExtractedPeak`s, plus zero-origin rescaling

pub mod extract;
pub mod segment;

pub use extract::*;
pub use segment::*;
