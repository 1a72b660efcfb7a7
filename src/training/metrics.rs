//! Regression metrics

use crate::error::{Result, TrainerError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

fn check_aligned(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(TrainerError::SchemaMismatch(format!(
            "{} labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(TrainerError::SchemaMismatch(
            "cannot score an empty label vector".to_string(),
        ));
    }
    Ok(())
}

/// Coefficient of determination: `1 - SS_res / SS_tot`.
///
/// A constant `y_true` has no variance to explain; the score is then 1.0 for
/// a perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_aligned(y_true, y_pred)?;

    let y_mean = y_true.mean().unwrap_or(0.0);
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Summary of a regressor's error on held-out data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        check_aligned(y_true, y_pred)?;

        let n = y_true.len() as f64;
        let errors = y_true - y_pred;
        let mse = errors.mapv(|e| e * e).sum() / n;
        let mae = errors.mapv(f64::abs).sum() / n;

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2: r2_score(y_true, y_pred)?,
            n_samples: y_true.len(),
        })
    }
}
