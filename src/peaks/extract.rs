//! Extraction of per-peak sub-series, and zero-origin rescaling.

use log::debug;

use crate::domain::{ExtractedPeak, PeakSpan, SegmentConfig, Series};
use crate::error::PeakError;
use crate::peaks::segment::segment_with;

impl ExtractedPeak {
    /// Copy `[span.left_index, span.right_index)` of every channel.
    pub fn from_span(series: &Series, span: &PeakSpan) -> Result<Self, PeakError> {
        let len = series.len();
        if span.right_index > len {
            return Err(PeakError::IndexOutOfRange {
                index: span.right_index,
                len,
            });
        }
        if span.left_index > span.right_index {
            return Err(PeakError::IndexOutOfRange {
                index: span.left_index,
                len: span.right_index,
            });
        }
        if span.left_index == span.right_index {
            return Err(PeakError::EmptySpan {
                left: span.left_index,
                right: span.right_index,
            });
        }

        let range = span.left_index..span.right_index;
        Ok(Self {
            x_values: series.x()[range.clone()].to_vec(),
            h_values: series.h()[range.clone()].to_vec(),
            m_values: series.m()[range].to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    /// Zero-origined copy: each channel shifted so its first sample is zero.
    pub fn rescaled(&self) -> Result<Self, PeakError> {
        let mut out = self.clone();
        out.rescale_inplace()?;
        Ok(out)
    }

    /// Shift each channel in place so its first sample is zero.
    pub fn rescale_inplace(&mut self) -> Result<(), PeakError> {
        if self.is_empty() || self.h_values.is_empty() || self.m_values.is_empty() {
            return Err(PeakError::IndexOutOfRange { index: 0, len: 0 });
        }
        zero_origin(&mut self.x_values);
        zero_origin(&mut self.h_values);
        zero_origin(&mut self.m_values);
        Ok(())
    }
}

/// Subtract the first element from every element. No-op on an empty slice.
pub fn zero_origin(values: &mut [f64]) {
    let Some(&first) = values.first() else {
        return;
    };
    for v in values.iter_mut() {
        *v -= first;
    }
}

/// Segment the `m` channel with the default floor and extract every span.
pub fn extract_all(series: &Series, rel_height: f64) -> Result<Vec<ExtractedPeak>, PeakError> {
    let config = SegmentConfig::with_rel_height(rel_height)?;
    Ok(extract_all_with(series, &config)?
        .into_iter()
        .map(|(_, peak)| peak)
        .collect())
}

/// Segment the `m` channel and extract every span, keeping each span alongside its peak.
pub fn extract_all_with(
    series: &Series,
    config: &SegmentConfig,
) -> Result<Vec<(PeakSpan, ExtractedPeak)>, PeakError> {
    let spans = segment_with(series.m(), config)?;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let peak = ExtractedPeak::from_span(series, &span)?;
        debug!(
            "extracted {} samples for apex {} ([{}, {}))",
            peak.len(),
            span.apex_index,
            span.left_index,
            span.right_index
        );
        out.push((span, peak));
    }
    Ok(out)
}
