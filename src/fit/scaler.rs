//! Per-column feature standardization.
//!
//! The scaler is fitted on the training split only and applied everywhere
//! else (test split, serving rows), so its parameters are part of the
//! persisted artifact. Standard deviations are population (ddof = 0);
//! zero-variance columns get scale 1 so transforming never divides by zero.

use nalgebra::DMatrix;

use crate::domain::ScalerParams;

/// Fit mean/scale parameters over the rows of `x`.
pub fn fit_scaler(x: &DMatrix<f64>) -> ScalerParams {
    let n = x.nrows().max(1) as f64;
    let p = x.ncols();

    let mut mean = vec![0.0; p];
    let mut scale = vec![1.0; p];

    for j in 0..p {
        let col = x.column(j);
        let m = col.iter().sum::<f64>() / n;
        let var = col.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;
        let s = var.sqrt();
        mean[j] = m;
        scale[j] = if s > 0.0 { s } else { 1.0 };
    }

    ScalerParams { mean, scale }
}

/// Standardize a whole matrix.
pub fn transform(x: &DMatrix<f64>, params: &ScalerParams) -> DMatrix<f64> {
    let mut out = x.clone();
    for j in 0..out.ncols() {
        let m = params.mean[j];
        let s = params.scale[j];
        for v in out.column_mut(j).iter_mut() {
            *v = (*v - m) / s;
        }
    }
    out
}

/// Standardize a single row (serving path).
pub fn transform_row(row: &[f64], params: &ScalerParams) -> Vec<f64> {
    row.iter()
        .zip(params.mean.iter().zip(params.scale.iter()))
        .map(|(v, (m, s))| (v - m) / s)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transformed_columns_have_zero_mean_unit_std() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let params = fit_scaler(&x);
        let z = transform(&x, &params);

        let mean: f64 = z.column(0).iter().sum::<f64>() / 4.0;
        let var: f64 = z.column(0).iter().map(|v| v * v).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_left_centred_not_divided() {
        let x = DMatrix::from_row_slice(3, 1, &[5.0, 5.0, 5.0]);
        let params = fit_scaler(&x);
        assert_eq!(params.scale[0], 1.0);
        let z = transform(&x, &params);
        assert!(z.column(0).iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn row_transform_matches_matrix_transform() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        let params = fit_scaler(&x);
        let z = transform(&x, &params);
        let row = transform_row(&[2.0, 20.0], &params);
        assert!((z[(1, 0)] - row[0]).abs() < 1e-12);
        assert!((z[(1, 1)] - row[1]).abs() < 1e-12);
    }
}
