//! Local maxima, prominences and interpolated widths of a 1-D signal.
//!
//! These are the three primitive passes the segmenter is built on:
//!
//! 1. `local_maxima`: indices strictly above their left neighbour and the first
//!    differing sample to their right (plateaus report their midpoint)
//! 2. `peak_prominences`: height above the higher of the two bounding bases
//! 3. `peak_widths`: horizontal crossing points at `peak - rel_height * prominence`
//!
//! Each pass returns one entry per input peak, in the same order.

/// Prominence of each peak plus the base indices it was measured against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prominences {
    pub prominences: Vec<f64>,
    pub left_bases: Vec<usize>,
    pub right_bases: Vec<usize>,
}

/// Widths and interpolated crossing points of each peak.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakWidths {
    pub widths: Vec<f64>,
    pub width_heights: Vec<f64>,
    pub left_ips: Vec<f64>,
    pub right_ips: Vec<f64>,
}

impl PeakWidths {
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Find local maxima. The first and last samples are never reported.
pub fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let i_max = signal.len() - 1;
    let mut i = 1;
    while i < i_max {
        if signal[i - 1] < signal[i] {
            let mut i_ahead = i + 1;
            while i_ahead < i_max && signal[i_ahead] == signal[i] {
                i_ahead += 1;
            }
            if signal[i_ahead] < signal[i] {
                let left_edge = i;
                let right_edge = i_ahead - 1;
                peaks.push((left_edge + right_edge) / 2);
                i = i_ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Compute prominences for `peaks` (indices into `signal`).
///
/// Each base is the minimum of the run of samples no higher than the peak,
/// scanning outwards until a higher sample or the signal edge.
pub fn peak_prominences(signal: &[f64], peaks: &[usize]) -> Prominences {
    let mut out = Prominences {
        prominences: Vec::with_capacity(peaks.len()),
        left_bases: Vec::with_capacity(peaks.len()),
        right_bases: Vec::with_capacity(peaks.len()),
    };

    for &peak in peaks {
        let height = signal[peak];

        let mut left_base = peak;
        let mut left_min = height;
        for (i, &v) in signal[..=peak].iter().enumerate().rev() {
            if v > height {
                break;
            }
            if v < left_min {
                left_min = v;
                left_base = i;
            }
        }

        let mut right_base = peak;
        let mut right_min = height;
        for (i, &v) in signal.iter().enumerate().skip(peak) {
            if v > height {
                break;
            }
            if v < right_min {
                right_min = v;
                right_base = i;
            }
        }

        out.prominences.push(height - left_min.max(right_min));
        out.left_bases.push(left_base);
        out.right_bases.push(right_base);
    }
    out
}

/// Compute widths at `peak - rel_height * prominence` for each peak.
///
/// `prominences` must come from [`peak_prominences`] over the same peaks.
pub fn peak_widths(
    signal: &[f64],
    peaks: &[usize],
    rel_height: f64,
    prominences: &Prominences,
) -> PeakWidths {
    let mut out = PeakWidths {
        widths: Vec::with_capacity(peaks.len()),
        width_heights: Vec::with_capacity(peaks.len()),
        left_ips: Vec::with_capacity(peaks.len()),
        right_ips: Vec::with_capacity(peaks.len()),
    };

    let entries = peaks
        .iter()
        .zip(&prominences.prominences)
        .zip(prominences.left_bases.iter().zip(&prominences.right_bases));

    for ((&peak, &prominence), (&left_base, &right_base)) in entries {
        let height = signal[peak] - prominence * rel_height;

        let mut i = peak;
        while left_base < i && height < signal[i] {
            i -= 1;
        }
        let mut left_ip = i as f64;
        if signal[i] < height {
            left_ip += (height - signal[i]) / (signal[i + 1] - signal[i]);
        }

        let mut i = peak;
        while i < right_base && height < signal[i] {
            i += 1;
        }
        let mut right_ip = i as f64;
        if signal[i] < height {
            right_ip -= (height - signal[i]) / (signal[i - 1] - signal[i]);
        }

        out.widths.push(right_ip - left_ip);
        out.width_heights.push(height);
        out.left_ips.push(left_ip);
        out.right_ips.push(right_ip);
    }
    out
}
