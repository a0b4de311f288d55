//! Linear least squares for the damped Gauss-Newton step.
//!
//! Each Levenberg-Marquardt iteration solves
//!
//! ```text
//! minimize ||J δ - r||² + λ ||D δ||²
//! ```
//!
//! which is an ordinary least squares problem on the stacked system
//! `[J; sqrt(λ) D] δ = [r; 0]`. Solving the stacked system via SVD avoids
//! forming `JᵀJ`, whose condition number is the square of `J`'s.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve for the damped step `δ` given Jacobian `j`, residuals `r`, column
/// scales `scale` and damping `lambda`.
pub fn solve_damped_step(
    j: &DMatrix<f64>,
    r: &DVector<f64>,
    scale: &DVector<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    let (n, p) = j.shape();
    let mut a = DMatrix::<f64>::zeros(n + p, p);
    let mut b = DVector::<f64>::zeros(n + p);

    a.view_mut((0, 0), (n, p)).copy_from(j);
    b.rows_mut(0, n).copy_from(r);

    let sqrt_lambda = lambda.sqrt();
    for k in 0..p {
        a[(n + k, k)] = sqrt_lambda * scale[k];
    }

    solve_least_squares(&a, &b)
}

/// Numerical rank test: `true` when `j` has full column rank.
pub fn has_full_column_rank(j: &DMatrix<f64>) -> bool {
    let (_, p) = j.shape();
    if j.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let sv = j.clone().svd(false, false).singular_values;
    let max = sv.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return false;
    }
    let tol = max * f64::EPSILON * (j.nrows().max(p) as f64) * 1e3;
    sv.iter().filter(|&&s| s > tol).count() == p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn zero_damping_is_plain_gauss_newton() {
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        let scale = DVector::from_element(2, 1.0);

        let step = solve_damped_step(&j, &r, &scale, 0.0).unwrap();
        assert!((step[0] - 2.0).abs() < 1e-10);
        assert!((step[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn damping_shrinks_the_step() {
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
        let scale = DVector::from_element(2, 1.0);

        let free = solve_damped_step(&j, &r, &scale, 0.0).unwrap();
        let damped = solve_damped_step(&j, &r, &scale, 100.0).unwrap();
        assert!(damped.norm() < free.norm());
    }

    #[test]
    fn rank_test_flags_dependent_columns() {
        let full = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        assert!(has_full_column_rank(&full));

        let dependent = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        assert!(!has_full_column_rank(&dependent));

        let zero_column = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        assert!(!has_full_column_rank(&zero_column));
    }
}
