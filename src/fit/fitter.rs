//! Logistic growth-curve fit for a single extracted peak.
//!
//! Given:
//! - positions `x_i`
//! - observed heights `h_i`
//!
//! we fit `h(x) = a / (1 + exp(-k (x - xc)))` by Levenberg-Marquardt,
//! starting from `a0 = max(h)`, `k0 = 1`, `xc0 = mean(x)`.
//!
//! `fit_peak` zero-origins `x` and `h` first so that `xc` (and therefore
//! big K) is comparable across peaks at different absolute positions.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::{ExtractedPeak, FitQuality, FitResult, LogisticParams};
use crate::error::{FitFailure, PeakError};
use crate::math::{minimize, LmOptions};
use crate::models::{fill_jacobian_row, predict, PARAM_COUNT};
use crate::peaks::zero_origin;

/// Minimum number of distinct `x` positions for a 3-parameter fit.
const MIN_DISTINCT_SAMPLES: usize = 3;

/// Fit the growth curve to a peak's `x`/`h` channels after zero-origin shifting.
pub fn fit_peak(peak: &ExtractedPeak) -> Result<FitResult, PeakError> {
    let mut x = peak.x_values.clone();
    let mut h = peak.h_values.clone();
    zero_origin(&mut x);
    zero_origin(&mut h);
    fit_logistic(&x, &h)
}

/// Fit the growth curve to `(x, h)` exactly as given.
pub fn fit_logistic(x: &[f64], h: &[f64]) -> Result<FitResult, PeakError> {
    fit_logistic_with(x, h, &LmOptions::for_params(PARAM_COUNT))
}

/// [`fit_logistic`] with explicit optimizer settings.
pub fn fit_logistic_with(x: &[f64], h: &[f64], options: &LmOptions) -> Result<FitResult, PeakError> {
    validate_inputs(x, h)?;

    let p0 = initial_guess(x, h);
    debug!(
        "fitting {} samples from a0={:.4}, k0={:.4}, xc0={:.4}",
        x.len(),
        p0.a,
        p0.k,
        p0.xc
    );

    let n = x.len();
    let residuals = |p: &DVector<f64>| {
        let params = LogisticParams::from_array([p[0], p[1], p[2]]);
        DVector::from_iterator(n, x.iter().zip(h).map(|(&xi, &hi)| hi - predict(&params, xi)))
    };
    let jacobian = |p: &DVector<f64>| {
        let params = LogisticParams::from_array([p[0], p[1], p[2]]);
        let mut j = DMatrix::<f64>::zeros(n, PARAM_COUNT);
        let mut row = [0.0; PARAM_COUNT];
        for (i, &xi) in x.iter().enumerate() {
            fill_jacobian_row(&params, xi, &mut row);
            for (c, v) in row.iter().enumerate() {
                j[(i, c)] = *v;
            }
        }
        j
    };

    let report = minimize(
        DVector::from_row_slice(&p0.as_array()),
        residuals,
        jacobian,
        options,
    )?;

    let params = LogisticParams::from_array([report.params[0], report.params[1], report.params[2]]);
    debug!(
        "converged after {} iterations: a={:.6}, k={:.6}, xc={:.6}, sse={:.3e}",
        report.iterations, params.a, params.k, params.xc, report.cost
    );

    Ok(FitResult {
        params,
        quality: FitQuality {
            sse: report.cost,
            rmse: (report.cost / n as f64).sqrt(),
            n,
            iterations: report.iterations,
            evaluations: report.evaluations,
        },
    })
}

/// `a0 = max(h)`, `k0 = 1`, `xc0 = mean(x)`.
pub fn initial_guess(x: &[f64], h: &[f64]) -> LogisticParams {
    let a = h.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let xc = if x.is_empty() {
        0.0
    } else {
        x.iter().sum::<f64>() / x.len() as f64
    };
    LogisticParams { a, k: 1.0, xc }
}

fn validate_inputs(x: &[f64], h: &[f64]) -> Result<(), FitFailure> {
    if x.len() != h.len() {
        return Err(FitFailure::LengthMismatch {
            x_len: x.len(),
            h_len: h.len(),
        });
    }
    if x.iter().chain(h).any(|v| !v.is_finite()) {
        return Err(FitFailure::NonFiniteInput);
    }
    let distinct = count_distinct(x);
    if distinct < MIN_DISTINCT_SAMPLES {
        return Err(FitFailure::TooFewSamples { distinct });
    }
    Ok(())
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}
