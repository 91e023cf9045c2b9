//! Ridge regression over the encoded feature matrix.
//!
//! The intercept is not penalized: we centre `x` and `y`, solve the
//! penalized system for the coefficients, and reconstruct the intercept
//! from the column means. Solving goes through the shared SVD-based
//! least-squares path in `math::ols`, which tolerates the near-collinear
//! dummy columns one-hot encoding can produce.

use nalgebra::{DMatrix, DVector};

use crate::domain::RidgeModel;
use crate::error::AppError;
use crate::math::solve_ridge;

/// Fit a ridge model. Fitting failures surface as numeric errors (the
/// "prediction failed" class); they are not retried.
pub fn fit_ridge(x: &DMatrix<f64>, y: &DVector<f64>, alpha: f64) -> Result<RidgeModel, AppError> {
    let (n, p) = x.shape();
    if n == 0 || p == 0 {
        return Err(AppError::empty("Cannot fit a regressor on an empty matrix."));
    }
    if n != y.len() {
        return Err(AppError::numeric(format!(
            "Feature matrix has {n} rows but target has {} values.",
            y.len()
        )));
    }

    let x_means: Vec<f64> = (0..p)
        .map(|j| x.column(j).iter().sum::<f64>() / n as f64)
        .collect();
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut xc = x.clone();
    for j in 0..p {
        for v in xc.column_mut(j).iter_mut() {
            *v -= x_means[j];
        }
    }
    let yc = DVector::from_iterator(n, y.iter().map(|v| v - y_mean));

    let coefs = solve_ridge(&xc, &yc, alpha)
        .ok_or_else(|| AppError::numeric("Ridge fit failed: system too ill-conditioned."))?;

    let intercept = y_mean
        - coefs
            .iter()
            .zip(x_means.iter())
            .map(|(c, m)| c * m)
            .sum::<f64>();

    Ok(RidgeModel {
        alpha,
        intercept,
        coefs: coefs.iter().copied().collect(),
    })
}

/// Predict over a whole matrix.
pub fn predict(model: &RidgeModel, x: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(
        x.nrows(),
        (0..x.nrows()).map(|i| {
            model.intercept
                + x.row(i)
                    .iter()
                    .zip(model.coefs.iter())
                    .map(|(v, c)| v * c)
                    .sum::<f64>()
        }),
    )
}

/// Predict a single row.
pub fn predict_row(model: &RidgeModel, row: &[f64]) -> f64 {
    model.intercept
        + model
            .coefs
            .iter()
            .zip(row.iter())
            .map(|(c, v)| c * v)
            .sum::<f64>()
}
