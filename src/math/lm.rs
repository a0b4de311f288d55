//! Levenberg-Marquardt minimizer for small nonlinear least-squares problems.
//!
//! Minimizes `Σ r_i(p)²` where `r = y - f(p)`, given callbacks for the
//! residual vector and the model Jacobian `∂f/∂p`.
//!
//! The damping is Marquardt-scaled: `D` holds the running maximum of each
//! Jacobian column norm, so parameters of very different magnitude
//! (an amplitude in the hundreds, a rate near 0.1) are damped evenly.

use log::trace;
use nalgebra::{DMatrix, DVector};

use crate::error::FitFailure;
use crate::math::ols::{has_full_column_rank, solve_damped_step};

/// Stopping criteria for [`minimize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmOptions {
    /// Maximum number of residual evaluations.
    pub max_evals: usize,
    /// Relative reduction in the sum of squares below which we stop.
    pub ftol: f64,
    /// Relative step size below which we stop.
    pub xtol: f64,
    /// Starting damping factor.
    pub initial_lambda: f64,
    /// Damping above which the search is declared stalled.
    pub max_lambda: f64,
}

impl LmOptions {
    /// Defaults sized for `n_params` free parameters.
    pub fn for_params(n_params: usize) -> Self {
        Self {
            max_evals: 200 * (n_params + 1),
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            initial_lambda: 1e-3,
            max_lambda: 1e16,
        }
    }
}

/// Result of a converged minimization.
#[derive(Debug, Clone)]
pub struct LmReport {
    pub params: DVector<f64>,
    /// Final sum of squared residuals.
    pub cost: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Minimize `||residuals(p)||²` starting from `p0`.
///
/// `residuals` returns `y - f(p)`; `jacobian` returns `∂f/∂p` (rows are
/// observations, columns parameters).
pub fn minimize<R, J>(
    p0: DVector<f64>,
    residuals: R,
    jacobian: J,
    options: &LmOptions,
) -> Result<LmReport, FitFailure>
where
    R: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> DMatrix<f64>,
{
    if p0.iter().any(|v| !v.is_finite()) {
        return Err(FitFailure::NonFiniteParameters);
    }

    let mut p = p0;
    let mut r = residuals(&p);
    let mut evaluations = 1;
    let mut cost = r.norm_squared();
    if !cost.is_finite() {
        return Err(FitFailure::NonFiniteInput);
    }

    let mut j = jacobian(&p);
    if !has_full_column_rank(&j) {
        return Err(FitFailure::SingularJacobian);
    }
    let mut scale = column_norms(&j);
    let mut lambda = options.initial_lambda;
    let mut iterations = 0;

    loop {
        if cost <= f64::MIN_POSITIVE {
            break;
        }
        if evaluations >= options.max_evals {
            return Err(FitFailure::BudgetExhausted {
                max_evals: options.max_evals,
            });
        }
        iterations += 1;

        let Some(step) = solve_damped_step(&j, &r, &scale, lambda) else {
            lambda *= 10.0;
            if lambda > options.max_lambda {
                return Err(FitFailure::Stalled);
            }
            continue;
        };

        let step_norm = step.norm();
        let small_step = step_norm <= options.xtol * (p.norm() + options.xtol);
        let candidate = &p + &step;
        let r_new = residuals(&candidate);
        evaluations += 1;
        let cost_new = r_new.norm_squared();

        trace!(
            "lm iter {iterations}: cost={cost:.6e} candidate={cost_new:.6e} lambda={lambda:.3e} |step|={step_norm:.3e}"
        );

        if cost_new.is_finite() && cost_new < cost {
            let reduction = (cost - cost_new) / cost;
            p = candidate;
            r = r_new;
            cost = cost_new;
            lambda = (lambda / 10.0).max(1e-15);

            if reduction <= options.ftol || small_step {
                break;
            }

            j = jacobian(&p);
            if !has_full_column_rank(&j) {
                return Err(FitFailure::SingularJacobian);
            }
            for (s, c) in scale.iter_mut().zip(column_norms(&j).iter()) {
                *s = s.max(*c);
            }
        } else {
            // No further progress possible from here.
            if small_step {
                break;
            }
            lambda *= 10.0;
            if lambda > options.max_lambda {
                return Err(FitFailure::Stalled);
            }
        }
    }

    if p.iter().any(|v| !v.is_finite()) {
        return Err(FitFailure::NonFiniteParameters);
    }

    Ok(LmReport {
        params: p,
        cost,
        iterations,
        evaluations,
    })
}

fn column_norms(j: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(
        j.ncols(),
        j.column_iter().map(|c| {
            let n = c.norm();
            if n > 0.0 { n } else { 1.0 }
        }),
    )
}
