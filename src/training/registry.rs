//! Candidate model registry
//!
//! Every call hands out brand-new, untrained instances so nothing fitted in
//! one run (or by one sibling candidate) can leak into another.

use super::linear_models::{
    ElasticNetRegression, LassoRegression, LinearRegression, RidgeRegression,
};
use super::models::CandidateModel;
use indexmap::IndexMap;

/// Ordered mapping from model name to an untrained candidate
pub type Candidates = IndexMap<String, CandidateModel>;

/// Registry of the regressors competing in a training run
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRegistry;

impl ModelRegistry {
    /// Registered model names, in evaluation order
    pub const NAMES: [&'static str; 4] = ["LinearRegression", "Lasso", "Ridge", "ElasticNet"];

    /// Fresh untrained candidates with default configuration
    pub fn candidates() -> Candidates {
        let mut models = IndexMap::new();
        models.insert(
            "LinearRegression".to_string(),
            CandidateModel::LinearRegression(LinearRegression::new()),
        );
        models.insert(
            "Lasso".to_string(),
            CandidateModel::Lasso(LassoRegression::default()),
        );
        models.insert(
            "Ridge".to_string(),
            CandidateModel::Ridge(RidgeRegression::default()),
        );
        models.insert(
            "ElasticNet".to_string(),
            CandidateModel::ElasticNet(ElasticNetRegression::default()),
        );
        models
    }

    /// A single fresh candidate by name
    pub fn create(name: &str) -> Option<CandidateModel> {
        Self::candidates().shift_remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::Regressor;
    use ndarray::array;

    #[test]
    fn test_registry_order() {
        let names: Vec<String> = ModelRegistry::candidates().keys().cloned().collect();
        assert_eq!(names, ModelRegistry::NAMES.to_vec());
    }

    #[test]
    fn test_candidates_are_untrained() {
        assert!(ModelRegistry::candidates().values().all(|m| !m.is_fitted()));
    }

    #[test]
    fn test_candidates_are_fresh_per_call() {
        let mut first = ModelRegistry::candidates();
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        for model in first.values_mut() {
            model.fit(&x, &y).unwrap();
        }

        let second = ModelRegistry::candidates();
        assert!(second.values().all(|m| !m.is_fitted()));
    }

    #[test]
    fn test_default_hyperparameters() {
        match ModelRegistry::create("ElasticNet") {
            Some(CandidateModel::ElasticNet(m)) => {
                assert_eq!(m.alpha, 1.0);
                assert_eq!(m.l1_ratio, 0.5);
            }
            other => panic!("unexpected candidate: {:?}", other),
        }
        assert!(ModelRegistry::create("RandomForest").is_none());
    }
}
