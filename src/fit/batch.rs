//! Fan-out of independent per-peak fits.
//!
//! Each peak is fitted on its own; a failure is recorded against that peak
//! and the batch continues. Results come back in detection order.

use log::{info, warn};
use rayon::prelude::*;

use crate::domain::{ExtractedPeak, PeakFit, PeakSpan};
use crate::fit::fit_peak;

/// Fit every extracted peak in parallel.
pub fn fit_all(peaks: &[(PeakSpan, ExtractedPeak)]) -> Vec<PeakFit> {
    let fits: Vec<PeakFit> = peaks
        .par_iter()
        .enumerate()
        .map(|(ordinal, (span, peak))| PeakFit {
            ordinal,
            span: Some(*span),
            outcome: fit_peak(peak).map_err(|e| e.with_span(*span)),
        })
        .collect();

    let mut failed = 0;
    for fit in &fits {
        if let Err(err) = &fit.outcome {
            warn!("peak {}: {err}", fit.ordinal);
            failed += 1;
        }
    }
    info!("fitted {} peaks ({} failed)", fits.len(), failed);
    fits
}
