//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between the segmenter, extractor and fitter
//! - exported to CSV/JSON
//! - reloaded later for plotting

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PeakError;

/// Default detection floor for the `m` channel.
pub const DEFAULT_MIN_HEIGHT: f64 = 1.0;

/// Default fraction of prominence at which spans are measured.
pub const DEFAULT_REL_HEIGHT: f64 = 0.95;

/// A three-channel measurement series, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    x: Vec<f64>,
    h: Vec<f64>,
    m: Vec<f64>,
}

impl Series {
    pub fn new(x: Vec<f64>, h: Vec<f64>, m: Vec<f64>) -> Result<Self, PeakError> {
        if x.len() != h.len() || x.len() != m.len() {
            return Err(PeakError::ChannelLengthMismatch {
                x: x.len(),
                h: h.len(),
                m: m.len(),
            });
        }
        Ok(Self { x, h, m })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn h(&self) -> &[f64] {
        &self.h
    }

    pub fn m(&self) -> &[f64] {
        &self.m
    }

    /// Mutable access to the three channels at once.
    ///
    /// Lengths cannot change through slices, so the alignment invariant holds.
    pub fn channels_mut(&mut self) -> (&mut [f64], &mut [f64], &mut [f64]) {
        (&mut self.x, &mut self.h, &mut self.m)
    }
}

/// Index interval produced by the segmenter for one detected peak.
///
/// `peak_index` equals the clamped left bound, which is what downstream
/// indexing keys on. `apex_index` is where the local maximum actually is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakSpan {
    pub peak_index: usize,
    pub apex_index: usize,
    pub left_index: usize,
    pub right_index: usize,
}

impl PeakSpan {
    pub fn len(&self) -> usize {
        self.right_index.saturating_sub(self.left_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        self.left_index <= index && index < self.right_index
    }

    pub fn overlaps(&self, other: &PeakSpan) -> bool {
        self.left_index < other.right_index && other.left_index < self.right_index
    }
}

/// One peak's samples, copied out of a [`Series`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedPeak {
    pub x_values: Vec<f64>,
    pub h_values: Vec<f64>,
    pub m_values: Vec<f64>,
}

/// Parameters of `h(x) = a / (1 + exp(-k (x - xc)))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub a: f64,
    pub k: f64,
    pub xc: f64,
}

impl LogisticParams {
    pub fn big_k(&self) -> f64 {
        self.k * 2.0 * self.xc
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.a, self.k, self.xc]
    }

    pub fn from_array(p: [f64; 3]) -> Self {
        Self {
            a: p[0],
            k: p[1],
            xc: p[2],
        }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Output of a single growth-curve fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: LogisticParams,
    pub quality: FitQuality,
}

impl FitResult {
    pub fn big_k(&self) -> f64 {
        self.params.big_k()
    }
}

/// Tagged outcome of fitting one extracted peak.
#[derive(Debug, Clone)]
pub struct PeakFit {
    /// Position of the peak in detection order.
    pub ordinal: usize,
    pub span: Option<PeakSpan>,
    pub outcome: Result<FitResult, PeakError>,
}

impl PeakFit {
    pub fn big_k(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(FitResult::big_k)
    }
}

/// Peak detection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentConfig {
    pub min_height: f64,
    pub rel_height: f64,
}

impl SegmentConfig {
    pub fn new(min_height: f64, rel_height: f64) -> Result<Self, PeakError> {
        let config = Self {
            min_height,
            rel_height,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_rel_height(rel_height: f64) -> Result<Self, PeakError> {
        Self::new(DEFAULT_MIN_HEIGHT, rel_height)
    }

    pub fn validate(&self) -> Result<(), PeakError> {
        if !self.min_height.is_finite() {
            return Err(PeakError::InvalidMinHeight(self.min_height));
        }
        if !(self.rel_height > 0.0 && self.rel_height <= 1.0) {
            return Err(PeakError::InvalidRelHeight(self.rel_height));
        }
        Ok(())
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_height: DEFAULT_MIN_HEIGHT,
            rel_height: DEFAULT_REL_HEIGHT,
        }
    }
}

/// Configuration for the `extract` tool.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub segment: SegmentConfig,
}

/// A full fit run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub segment: SegmentConfig,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub plot_dir: Option<PathBuf>,

    pub export_big_k: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

/// Configuration for the step histogram tool.
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub segment: SegmentConfig,
    pub bin_count: usize,
    pub max_bin: usize,
}

/// One row of a peak table on disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakRow {
    pub x: f64,
    pub h: f64,
    pub m: f64,
}

/// Per-peak entry of a saved run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSummary {
    pub ordinal: usize,
    pub span: Option<PeakSpan>,
    pub params: Option<LogisticParams>,
    pub quality: Option<FitQuality>,
    pub big_k: Option<f64>,
    pub error: Option<String>,
}

/// A saved run summary (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub input: PathBuf,
    pub min_height: f64,
    pub rel_height: f64,
    pub samples: usize,
    pub peaks: Vec<PeakSummary>,
}

impl SummaryFile {
    pub fn big_k_values(&self) -> Vec<Option<f64>> {
        self.peaks.iter().map(|p| p.big_k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rejects_unaligned_channels() {
        let err = Series::new(vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            PeakError::ChannelLengthMismatch { x: 2, h: 1, m: 2 }
        ));
    }

    #[test]
    fn segment_config_bounds_rel_height() {
        assert!(SegmentConfig::with_rel_height(1.0).is_ok());
        assert!(SegmentConfig::with_rel_height(0.5).is_ok());
        assert!(matches!(
            SegmentConfig::with_rel_height(0.0),
            Err(PeakError::InvalidRelHeight(_))
        ));
        assert!(matches!(
            SegmentConfig::with_rel_height(1.5),
            Err(PeakError::InvalidRelHeight(_))
        ));
        assert!(matches!(
            SegmentConfig::with_rel_height(f64::NAN),
            Err(PeakError::InvalidRelHeight(_))
        ));
        assert!(matches!(
            SegmentConfig::new(f64::INFINITY, 0.95),
            Err(PeakError::InvalidMinHeight(_))
        ));
    }

    #[test]
    fn big_k_is_k_times_two_xc() {
        let p = LogisticParams {
            a: 10.0,
            k: 0.5,
            xc: 5.0,
        };
        assert_eq!(p.big_k(), 5.0);
    }

    #[test]
    fn span_overlap() {
        let a = PeakSpan {
            peak_index: 0,
            apex_index: 4,
            left_index: 0,
            right_index: 10,
        };
        let b = PeakSpan {
            peak_index: 8,
            apex_index: 12,
            left_index: 8,
            right_index: 16,
        };
        let c = PeakSpan {
            peak_index: 10,
            apex_index: 12,
            left_index: 10,
            right_index: 16,
        };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(9));
        assert!(!a.contains(10));
    }
}
