//! Peak segmentation: `m` channel -> index spans.
//!
//! Spans are measured at `rel_height` of each peak's prominence, rounded to
//! whole samples (ties to even), widened by one sample on the right so the
//! bound is exclusive, and clamped to the series.

use log::debug;

use crate::domain::{PeakSpan, SegmentConfig};
use crate::error::PeakError;
use crate::math::{local_maxima, peak_prominences, peak_widths, PeakWidths};

/// Segment `m_channel` into one span per detected peak, in ascending apex order.
pub fn segment(m_channel: &[f64], min_height: f64, rel_height: f64) -> Result<Vec<PeakSpan>, PeakError> {
    segment_with(m_channel, &SegmentConfig::new(min_height, rel_height)?)
}

/// Same as [`segment`] with a pre-validated configuration.
pub fn segment_with(m_channel: &[f64], config: &SegmentConfig) -> Result<Vec<PeakSpan>, PeakError> {
    config.validate()?;

    let mut peaks = local_maxima(m_channel);
    peaks.retain(|&i| m_channel[i] > config.min_height);

    let prominences = peak_prominences(m_channel, &peaks);
    let widths = peak_widths(m_channel, &peaks, config.rel_height, &prominences);

    let spans = spans_from_widths(&peaks, &widths, m_channel.len())?;
    debug!(
        "segmented {} samples into {} spans (min_height={}, rel_height={})",
        m_channel.len(),
        spans.len(),
        config.min_height,
        config.rel_height
    );
    Ok(spans)
}

/// Turn interpolated crossing points into clamped integer spans.
pub fn spans_from_widths(peaks: &[usize], widths: &PeakWidths, len: usize) -> Result<Vec<PeakSpan>, PeakError> {
    if widths.left_ips.len() != peaks.len() || widths.right_ips.len() != peaks.len() {
        return Err(PeakError::ShapeMismatch {
            peaks: peaks.len(),
            widths: widths.left_ips.len().min(widths.right_ips.len()),
        });
    }

    let spans = peaks
        .iter()
        .zip(widths.left_ips.iter().zip(&widths.right_ips))
        .map(|(&apex, (&left_ip, &right_ip))| {
            let left = left_ip.round_ties_even().max(0.0) as usize;
            let right = (right_ip.round_ties_even() + 1.0).max(0.0) as usize;
            let right = right.min(len);
            debug!("peak at {apex}: crossings [{left_ip:.3}, {right_ip:.3}] -> [{left}, {right})");
            PeakSpan {
                peak_index: left,
                apex_index: apex,
                left_index: left,
                right_index: right,
            }
        })
        .collect();
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian(len: usize, center: f64, sigma: f64, amplitude: f64) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let d = i as f64 - center;
                amplitude * (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .collect()
    }

    #[test]
    fn single_bump_yields_one_span_containing_the_maximum() {
        let m = gaussian(101, 50.0, 6.0, 5.0);
        let spans = segment(&m, 1.0, 0.95).unwrap();

        assert_eq!(spans.len(), 1);
        let span = spans[0];
        assert_eq!(span.apex_index, 50);
        assert!(span.contains(50));
        assert!(span.left_index < 50 && span.right_index > 51);
    }

    #[test]
    fn peak_index_is_the_left_bound_and_apex_is_the_maximum() {
        let m = gaussian(61, 30.0, 4.0, 3.0);
        let spans = segment(&m, 1.0, 0.5).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].peak_index, spans[0].left_index);
        assert_eq!(spans[0].apex_index, 30);
        assert_ne!(spans[0].peak_index, spans[0].apex_index);
    }

    #[test]
    fn right_bound_is_rounded_crossing_plus_one() {
        // Triangle: half-prominence crossings at 1.5 and 4.5.
        let m = [0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        let spans = segment(&m, 1.0, 0.5).unwrap();
        assert_eq!(spans.len(), 1);
        // 1.5 and 4.5 round to even: 2 and 4.
        assert_eq!(spans[0].left_index, 2);
        assert_eq!(spans[0].right_index, 5);
    }

    #[test]
    fn spans_are_clamped_to_series_bounds() {
        // Peak right next to each edge.
        let m = [0.0, 4.0, 0.5, 0.2, 0.5, 4.0, 0.0];
        let spans = segment(&m, 1.0, 1.0).unwrap();
        assert_eq!(spans.len(), 2);
        for span in &spans {
            assert!(span.left_index <= span.peak_index);
            assert!(span.peak_index < span.right_index);
            assert!(span.right_index <= m.len());
        }
        assert_eq!(spans[0].left_index, 0);
        assert_eq!(spans[1].right_index, m.len());
    }

    #[test]
    fn clamping_handles_out_of_range_crossings() {
        let widths = PeakWidths {
            widths: vec![12.0],
            width_heights: vec![0.0],
            left_ips: vec![-2.4],
            right_ips: vec![9.6],
        };
        let spans = spans_from_widths(&[3], &widths, 8).unwrap();
        assert_eq!(spans[0].left_index, 0);
        assert_eq!(spans[0].right_index, 8);
    }

    #[test]
    fn min_height_is_a_strict_floor() {
        let m = [0.0, 1.0, 0.0, 2.0, 0.0];
        let spans = segment(&m, 1.0, 0.95).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].apex_index, 3);
    }

    #[test]
    fn close_peaks_may_overlap() {
        let mut m = gaussian(80, 30.0, 5.0, 4.0);
        for (v, w) in m.iter_mut().zip(gaussian(80, 46.0, 5.0, 3.0)) {
            *v += w;
        }
        // Two maxima with a saddle near 1.9 in between: the taller peak's
        // base lies past the smaller one, so its span swallows it.
        let spans = segment(&m, 1.0, 0.95).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].apex_index, 30);
        assert_eq!(spans[1].apex_index, 46);
        assert!(spans[0].overlaps(&spans[1]));
        assert!(spans[0].contains(46));
    }

    #[test]
    fn mismatched_widths_are_rejected() {
        let widths = PeakWidths {
            widths: vec![1.0],
            width_heights: vec![0.5],
            left_ips: vec![1.0],
            right_ips: vec![2.0],
        };
        let err = spans_from_widths(&[1, 4], &widths, 10).unwrap_err();
        assert!(matches!(err, PeakError::ShapeMismatch { peaks: 2, widths: 1 }));
    }

    #[test]
    fn invalid_rel_height_is_rejected() {
        let m = gaussian(21, 10.0, 2.0, 3.0);
        assert!(matches!(segment(&m, 1.0, 0.0), Err(PeakError::InvalidRelHeight(_))));
        assert!(matches!(segment(&m, 1.0, 1.01), Err(PeakError::InvalidRelHeight(_))));
    }

    #[test]
    fn flat_signal_has_no_spans() {
        let m = vec![2.0; 50];
        assert!(segment(&m, 1.0, 0.95).unwrap().is_empty());
        assert!(segment(&[], 1.0, 0.95).unwrap().is_empty());
    }
}
