//! Logistic growth-curve evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict `h(x)` given `(a, k, xc)` (for residuals/plots)
//! - fill a Jacobian row `∂h/∂(a, k, xc)` at `x` (for the LM step)

use crate::domain::LogisticParams;

/// Number of free parameters in the model.
pub const PARAM_COUNT: usize = 3;

/// Numerically stable `1 / (1 + exp(-z))`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Predict `h(x) = a / (1 + exp(-k (x - xc)))`.
pub fn predict(params: &LogisticParams, x: f64) -> f64 {
    params.a * sigmoid(params.k * (x - params.xc))
}

/// Fill `out` with the partial derivatives of `predict` w.r.t. `(a, k, xc)`.
pub fn fill_jacobian_row(params: &LogisticParams, x: f64, out: &mut [f64; PARAM_COUNT]) {
    let dx = x - params.xc;
    let s = sigmoid(params.k * dx);
    let ds = params.a * s * (1.0 - s);
    out[0] = s;
    out[1] = ds * dx;
    out[2] = -ds * params.k;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_hits_half_height_at_inflection() {
        let p = LogisticParams {
            a: 10.0,
            k: 0.5,
            xc: 5.0,
        };
        assert!((predict(&p, 5.0) - 5.0).abs() < 1e-12);
        assert!(predict(&p, 100.0) > 9.999);
        assert!(predict(&p, -100.0) < 1e-6);
    }

    #[test]
    fn sigmoid_is_stable_for_large_arguments() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!(sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let p = LogisticParams {
            a: 3.0,
            k: 0.8,
            xc: 2.0,
        };
        let x = 2.7;
        let mut row = [0.0; PARAM_COUNT];
        fill_jacobian_row(&p, x, &mut row);

        let eps = 1e-6;
        let base = p.as_array();
        for j in 0..PARAM_COUNT {
            let mut hi = base;
            let mut lo = base;
            hi[j] += eps;
            lo[j] -= eps;
            let fd = (predict(&LogisticParams::from_array(hi), x)
                - predict(&LogisticParams::from_array(lo), x))
                / (2.0 * eps);
            assert!((fd - row[j]).abs() < 1e-6, "param {j}: {fd} vs {}", row[j]);
        }
    }
}
