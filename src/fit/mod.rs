//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - seeded train/test split
//! - feature standardization (`scaler`)
//! - ridge regression over the encoded matrix (`ridge`)
//! - held-out evaluation metrics

pub mod ridge;
pub mod scaler;

pub use ridge::*;
pub use scaler::*;

use nalgebra::DVector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::FitQuality;
use crate::error::AppError;

/// Deterministic shuffled split of `0..n` into (train, test) index sets.
///
/// The same `(n, test_size, seed)` always yields the same split.
pub fn train_test_split(
    n: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), AppError> {
    if n < 2 {
        return Err(AppError::empty(
            "Need at least 2 rows to split into train and test sets.",
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_size).round() as usize;
    let n_test = n_test.clamp(1, n - 1);

    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    Ok((train, test))
}

/// MAE / RMSE / R² over a held-out set.
pub fn evaluate(y_true: &DVector<f64>, y_pred: &DVector<f64>) -> FitQuality {
    let n = y_true.len();
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    for i in 0..n {
        let e = y_true[i] - y_pred[i];
        abs_sum += e.abs();
        sq_sum += e * e;
    }

    let mean = y_true.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y_true.iter().map(|v| (v - mean) * (v - mean)).sum();
    let r2 = if ss_tot > 0.0 { 1.0 - sq_sum / ss_tot } else { 0.0 };

    FitQuality {
        mae: abs_sum / n as f64,
        rmse: (sq_sum / n as f64).sqrt(),
        r2,
        n_test: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_is_deterministic_for_fixed_seed() {
        let (train_a, test_a) = train_test_split(100, 0.2, 42).unwrap();
        let (train_b, test_b) = train_test_split(100, 0.2, 42).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 20);
        assert_eq!(train_a.len(), 80);
    }

    #[test]
    fn split_differs_across_seeds() {
        let (_, test_a) = train_test_split(100, 0.2, 42).unwrap();
        let (_, test_b) = train_test_split(100, 0.2, 43).unwrap();
        assert_ne!(test_a, test_b);
    }

    #[test]
    fn split_partitions_all_indices() {
        let (train, test) = train_test_split(10, 0.3, 7).unwrap();
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn perfect_predictions_score_r2_one() {
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let q = evaluate(&y, &y.clone());
        assert!(q.mae.abs() < 1e-12);
        assert!(q.rmse.abs() < 1e-12);
        assert!((q.r2 - 1.0).abs() < 1e-12);
    }
}
