//! Input/output helpers.
//!
//! - series ingest (`ingest`)
//! - peak tables and big K CSV exports (`export`)
//! - JSON run summaries (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
