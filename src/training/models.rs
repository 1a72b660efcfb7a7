//! Regressor trait and the candidate model enum

use crate::error::Result;
use super::linear_models::{
    ElasticNetRegression, LassoRegression, LinearParams, LinearRegression, RidgeRegression,
};
use super::metrics::r2_score;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Trait for regression models
pub trait Regressor {
    /// Fit the model to training data, replacing any previous fit
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Fitted parameters, `None` until `fit` succeeds
    fn params(&self) -> Option<&LinearParams>;

    fn is_fitted(&self) -> bool {
        self.params().is_some()
    }

    /// R² of the predictions on `x` against `y`
    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        r2_score(y, &y_pred)
    }
}

/// One regressor eligible for selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CandidateModel {
    LinearRegression(LinearRegression),
    Lasso(LassoRegression),
    Ridge(RidgeRegression),
    ElasticNet(ElasticNetRegression),
}

impl CandidateModel {
    /// Human-readable description of the model family
    pub fn family(&self) -> &'static str {
        match self {
            CandidateModel::LinearRegression(_) => "ordinary least squares",
            CandidateModel::Lasso(_) => "L1-regularized least squares",
            CandidateModel::Ridge(_) => "L2-regularized least squares",
            CandidateModel::ElasticNet(_) => "L1/L2-regularized least squares",
        }
    }

    /// Hyperparameters as `(name, value)` pairs
    pub fn hyperparameters(&self) -> Vec<(&'static str, String)> {
        match self {
            CandidateModel::LinearRegression(m) => {
                vec![("fit_intercept", m.fit_intercept.to_string())]
            }
            CandidateModel::Lasso(m) => vec![
                ("alpha", m.alpha.to_string()),
                ("max_iter", m.max_iter.to_string()),
                ("tol", m.tol.to_string()),
            ],
            CandidateModel::Ridge(m) => vec![("alpha", m.alpha.to_string())],
            CandidateModel::ElasticNet(m) => vec![
                ("alpha", m.alpha.to_string()),
                ("l1_ratio", m.l1_ratio.to_string()),
                ("max_iter", m.max_iter.to_string()),
                ("tol", m.tol.to_string()),
            ],
        }
    }

    fn as_regressor(&self) -> &dyn Regressor {
        match self {
            CandidateModel::LinearRegression(m) => m,
            CandidateModel::Lasso(m) => m,
            CandidateModel::Ridge(m) => m,
            CandidateModel::ElasticNet(m) => m,
        }
    }

    fn as_regressor_mut(&mut self) -> &mut dyn Regressor {
        match self {
            CandidateModel::LinearRegression(m) => m,
            CandidateModel::Lasso(m) => m,
            CandidateModel::Ridge(m) => m,
            CandidateModel::ElasticNet(m) => m,
        }
    }
}

impl Regressor for CandidateModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.as_regressor_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.as_regressor().predict(x)
    }

    fn params(&self) -> Option<&LinearParams> {
        self.as_regressor().params()
    }
}
