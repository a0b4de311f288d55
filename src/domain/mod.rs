//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the measurement model (`Series`, `PeakSpan`, `ExtractedPeak`)
//! - fit outputs (`LogisticParams`, `FitResult`, `PeakFit`)
//! - run configuration (`SegmentConfig`, `RunConfig`, ...)
//! - on-disk records (`PeakRow`, `SummaryFile`)

pub mod types;

pub use types::*;
