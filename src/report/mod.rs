//! Reporting utilities: per-peak statistics and formatted terminal output.

use std::collections::HashSet;

use crate::domain::ExtractedPeak;
use crate::error::PeakError;

pub mod format;

pub use format::*;

/// Number of distinct `h` values inside a peak (its step count).
///
/// `-0.0` and `0.0` count as the same value.
pub fn count_unique_heights(peak: &ExtractedPeak) -> usize {
    peak.h_values
        .iter()
        .map(|&v| (v + 0.0).to_bits())
        .collect::<HashSet<u64>>()
        .len()
}

/// Step counts for a batch of peaks, in order.
pub fn step_counts(peaks: &[ExtractedPeak]) -> Vec<usize> {
    peaks.iter().map(count_unique_heights).collect()
}

/// Equal-width histogram with an overflow bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Values above the configured maximum.
    pub overflow: usize,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.overflow
    }
}

/// Bin `values` into `bin_count` equal-width bins over
/// `[min, min(max, max_value)]`.
///
/// - values above `max_value` go to `overflow`
/// - a degenerate range is widened by `±0.5`
/// - the last bin is right-inclusive
pub fn histogram(values: &[f64], bin_count: usize, max_value: f64) -> Histogram {
    let bins = bin_count.max(1);
    let in_range: Vec<f64> = values.iter().copied().filter(|&v| v <= max_value).collect();
    let overflow = values.len() - in_range.len();

    let (mut lo, mut hi) = if in_range.is_empty() {
        (0.0, 1.0)
    } else {
        (
            in_range.iter().copied().fold(f64::INFINITY, f64::min),
            in_range.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    };
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for v in in_range {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        edges,
        counts,
        overflow,
    }
}

/// Extent of one extracted group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMeasure {
    /// `x[last] - x[0]`
    pub width: f64,
    /// `h[last] - h[0]`
    pub height: f64,
}

/// Width and height gained across a peak table.
pub fn measure_group(peak: &ExtractedPeak) -> Result<GroupMeasure, PeakError> {
    let (Some(x0), Some(x1)) = (peak.x_values.first(), peak.x_values.last()) else {
        return Err(PeakError::IndexOutOfRange { index: 0, len: 0 });
    };
    let (Some(h0), Some(h1)) = (peak.h_values.first(), peak.h_values.last()) else {
        return Err(PeakError::IndexOutOfRange { index: 0, len: 0 });
    };
    Ok(GroupMeasure {
        width: x1 - x0,
        height: h1 - h0,
    })
}
