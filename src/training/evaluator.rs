//! Fit-and-score loop over the candidate models

use crate::error::{Result, TrainerError};
use super::models::Regressor;
use super::registry::Candidates;
use indexmap::IndexMap;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Feature/label arrays for one training run, with aligned shapes
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    x_train: Array2<f64>,
    y_train: Array1<f64>,
    x_test: Array2<f64>,
    y_test: Array1<f64>,
}

impl TrainTestSplit {
    /// Validate shapes and bundle the arrays.
    ///
    /// Row counts of each matrix must match its label vector, both feature
    /// matrices must have the same width, and neither side may be empty.
    pub fn new(
        x_train: Array2<f64>,
        y_train: Array1<f64>,
        x_test: Array2<f64>,
        y_test: Array1<f64>,
    ) -> Result<Self> {
        if x_train.nrows() != y_train.len() {
            return Err(TrainerError::SchemaMismatch(format!(
                "training matrix has {} rows but {} labels",
                x_train.nrows(),
                y_train.len()
            )));
        }
        if x_test.nrows() != y_test.len() {
            return Err(TrainerError::SchemaMismatch(format!(
                "test matrix has {} rows but {} labels",
                x_test.nrows(),
                y_test.len()
            )));
        }
        if x_train.ncols() != x_test.ncols() {
            return Err(TrainerError::SchemaMismatch(format!(
                "training matrix has {} columns but test matrix has {}",
                x_train.ncols(),
                x_test.ncols()
            )));
        }
        if x_train.nrows() == 0 || x_test.nrows() == 0 {
            return Err(TrainerError::SchemaMismatch(format!(
                "empty split: {} training rows, {} test rows",
                x_train.nrows(),
                x_test.nrows()
            )));
        }

        Ok(Self {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }

    pub fn x_train(&self) -> &Array2<f64> {
        &self.x_train
    }

    pub fn y_train(&self) -> &Array1<f64> {
        &self.y_train
    }

    pub fn x_test(&self) -> &Array2<f64> {
        &self.x_test
    }

    pub fn y_test(&self) -> &Array1<f64> {
        &self.y_test
    }

    pub fn n_features(&self) -> usize {
        self.x_train.ncols()
    }
}

/// Held-out R² per model, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    scores: IndexMap<String, f64>,
}

impl ModelReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, score: f64) {
        self.scores.insert(name.into(), score);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(name, score)| (name.as_str(), *score))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn as_map(&self) -> &IndexMap<String, f64> {
        &self.scores
    }
}

impl FromIterator<(String, f64)> for ModelReport {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, score)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:.6}", name, score)?;
        }
        write!(f, "}}")
    }
}

fn fit_and_score<M: Regressor + ?Sized>(model: &mut M, split: &TrainTestSplit) -> Result<f64> {
    model.fit(split.x_train(), split.y_train())?;
    let score = model.score(split.x_test(), split.y_test())?;
    if !score.is_finite() {
        return Err(TrainerError::Computation(format!(
            "non-finite R² score ({})",
            score
        )));
    }
    Ok(score)
}

/// Fit every candidate on the training arrays and score it on the test arrays.
///
/// Candidates are processed one at a time in registry order and are left
/// trained. The first failure aborts the whole evaluation.
pub fn evaluate_models(split: &TrainTestSplit, models: &mut Candidates) -> Result<ModelReport> {
    let mut report = ModelReport::new();

    for (name, model) in models.iter_mut() {
        debug!(model = %name, family = model.family(), "Fitting candidate");
        let start = Instant::now();

        let score = fit_and_score(model, split).map_err(|e| TrainerError::FitOrScore {
            model: name.clone(),
            reason: e.to_string(),
        })?;

        info!(
            model = %name,
            r2 = score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Candidate evaluated"
        );
        report.insert(name.clone(), score);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ModelRegistry;
    use ndarray::{array, Axis};

    fn split() -> TrainTestSplit {
        let x_train = array![
            [1.0, 4.0],
            [2.0, 3.0],
            [3.0, 5.0],
            [4.0, 1.0],
            [5.0, 2.0],
            [6.0, 6.0],
        ];
        let x_test = array![[1.5, 2.0], [3.5, 4.5], [5.5, 1.0]];
        let f = |x: &Array2<f64>| x.map_axis(Axis(1), |r| 10.0 + 2.0 * r[0] - r[1]);
        let (y_train, y_test) = (f(&x_train), f(&x_test));
        TrainTestSplit::new(x_train, y_train, x_test, y_test).unwrap()
    }

    #[test]
    fn test_report_keys_follow_registry_order() {
        let mut models = ModelRegistry::candidates();
        let report = evaluate_models(&split(), &mut models).unwrap();

        let report_names: Vec<&str> = report.names().collect();
        let model_names: Vec<&str> = models.keys().map(String::as_str).collect();
        assert_eq!(report_names, model_names);
        assert!(models.values().all(|m| m.is_fitted()));
    }

    #[test]
    fn test_exact_linear_data_scores_one() {
        let mut models = ModelRegistry::candidates();
        let report = evaluate_models(&split(), &mut models).unwrap();
        assert!(report.get("LinearRegression").unwrap() > 1.0 - 1e-9);
    }

    #[test]
    fn test_label_count_mismatch() {
        let err = TrainTestSplit::new(
            Array2::zeros((50, 3)),
            Array1::zeros(49),
            Array2::zeros((10, 3)),
            Array1::zeros(10),
        )
        .unwrap_err();
        assert!(matches!(err, TrainerError::SchemaMismatch(_)));
    }

    #[test]
    fn test_width_mismatch() {
        let err = TrainTestSplit::new(
            Array2::zeros((5, 3)),
            Array1::zeros(5),
            Array2::zeros((2, 2)),
            Array1::zeros(2),
        )
        .unwrap_err();
        assert!(matches!(err, TrainerError::SchemaMismatch(_)));
    }

    #[test]
    fn test_empty_test_side() {
        let err = TrainTestSplit::new(
            Array2::zeros((5, 2)),
            Array1::zeros(5),
            Array2::zeros((0, 2)),
            Array1::zeros(0),
        )
        .unwrap_err();
        assert!(matches!(err, TrainerError::SchemaMismatch(_)));
    }

    #[test]
    fn test_failure_names_the_model() {
        let mut models = ModelRegistry::candidates();
        if let Some(crate::training::CandidateModel::Lasso(lasso)) = models.get_mut("Lasso") {
            lasso.alpha = f64::NAN;
        }

        let err = evaluate_models(&split(), &mut models).unwrap_err();
        match err {
            TrainerError::FitOrScore { model, .. } => assert_eq!(model, "Lasso"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_report_display() {
        let report: ModelReport = vec![("A".to_string(), 0.5), ("B".to_string(), 0.25)]
            .into_iter()
            .collect();
        assert_eq!(report.to_string(), "{A: 0.500000, B: 0.250000}");
    }
}
