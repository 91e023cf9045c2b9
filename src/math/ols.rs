//! Least-squares solving for the price regressor.
//!
//! The final regression step solves one tall linear system over the encoded
//! feature matrix. One-hot encoded dummies can be nearly collinear (related
//! localities, overlapping area buckets), so we solve via SVD rather than a
//! normal-equations Cholesky, and we support an L2 (ridge) penalty expressed
//! as row augmentation:
//!
//! ```text
//! minimize ||y - X β||² + α ||β||²
//!   ==  OLS over  [ X          ] β = [ y ]
//!                 [ sqrt(α) I  ]     [ 0 ]
//! ```

use nalgebra::{DMatrix, DVector};

/// Solve a least-squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails; dummy
    // columns for rare categories can make the design matrix near-singular.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve a ridge-penalized least-squares problem by row augmentation.
///
/// The penalty applies to every coefficient of `x`; callers wanting an
/// unpenalized intercept should centre `x` and `y` first and reconstruct the
/// intercept from the means.
pub fn solve_ridge(x: &DMatrix<f64>, y: &DVector<f64>, alpha: f64) -> Option<DVector<f64>> {
    if alpha <= 0.0 {
        return solve_least_squares(x, y);
    }

    let (n, p) = x.shape();
    let sqrt_alpha = alpha.sqrt();

    let mut aug_x = DMatrix::<f64>::zeros(n + p, p);
    aug_x.view_mut((0, 0), (n, p)).copy_from(x);
    for j in 0..p {
        aug_x[(n + j, j)] = sqrt_alpha;
    }

    let mut aug_y = DVector::<f64>::zeros(n + p);
    aug_y.rows_mut(0, n).copy_from(y);

    solve_least_squares(&aug_x, &aug_y)
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
    fn ridge_shrinks_toward_zero() {
        let x = DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[0.0, 3.0, 6.0]);

        let ols = solve_ridge(&x, &y, 0.0).unwrap();
        let ridge = solve_ridge(&x, &y, 10.0).unwrap();
        assert!((ols[0] - 3.0).abs() < 1e-10);
        assert!(ridge[0] < ols[0]);
        assert!(ridge[0] > 0.0);
    }
}
