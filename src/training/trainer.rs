//! Model trainer: evaluate every registered candidate, keep the best one

use crate::error::{Result, TrainerError};
use crate::export::{save_object, ModelMetadata};
use super::config::ModelTrainerConfig;
use super::evaluator::{evaluate_models, ModelReport, TrainTestSplit};
use super::metrics::RegressionMetrics;
use super::models::{CandidateModel, Regressor};
use super::registry::ModelRegistry;
use super::selector::select_best_model;
use ndarray::{s, Array1, Array2};
use std::path::PathBuf;
use tracing::info;

/// What a successful training run produced
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub best_model_name: String,
    pub best_score: f64,
    /// Held-out R² of every candidate, in registry order
    pub report: ModelReport,
    /// Error summary of the winner on the test arrays
    pub test_metrics: RegressionMetrics,
    /// The trained winner, identical to what was persisted
    pub model: CandidateModel,
    pub model_path: PathBuf,
}

/// Split a combined array into predictors (all but last column) and labels
/// (last column).
pub fn split_features_and_target(data: &Array2<f64>) -> Result<(Array2<f64>, Array1<f64>)> {
    if data.ncols() < 2 {
        return Err(TrainerError::SchemaMismatch(format!(
            "need at least one predictor and one label column, got {} columns",
            data.ncols()
        )));
    }
    let label = data.ncols() - 1;
    Ok((
        data.slice(s![.., ..label]).to_owned(),
        data.column(label).to_owned(),
    ))
}

#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: ModelTrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: ModelTrainerConfig) -> Self {
        Self { config }
    }

    /// Train from combined train/test arrays whose last column is the label
    pub fn initiate_model_training(
        &self,
        train: &Array2<f64>,
        test: &Array2<f64>,
    ) -> Result<TrainingOutcome> {
        info!("Splitting dependent and independent data from train and test arrays");
        let (x_train, y_train) = split_features_and_target(train)?;
        let (x_test, y_test) = split_features_and_target(test)?;
        let split = TrainTestSplit::new(x_train, y_train, x_test, y_test)?;

        self.train(&split)
    }

    /// Evaluate fresh candidates on `split`, select the best and persist it
    pub fn train(&self, split: &TrainTestSplit) -> Result<TrainingOutcome> {
        let mut models = ModelRegistry::candidates();
        let report = evaluate_models(split, &mut models)?;
        info!(report = %report, "Model report");

        let selected = select_best_model(&report, models)?;
        info!(
            model = %selected.name,
            r2 = selected.score,
            "Best model found"
        );

        let y_pred = selected.model.predict(split.x_test())?;
        let test_metrics = RegressionMetrics::compute(split.y_test(), &y_pred)?;

        let metadata = selected.model.hyperparameters().into_iter().fold(
            ModelMetadata::new(selected.name.as_str())
                .with_model_type(selected.model.family())
                .with_score(selected.score)
                .with_n_features(split.n_features())
                .with_scores(report.as_map().clone()),
            |meta, (key, value)| meta.add_hyperparameter(key, value),
        );

        let model_path = self.config.trained_model_file_path.clone();
        save_object(&model_path, &selected.model, metadata)?;
        info!(path = %model_path.display(), "Trained model saved");

        Ok(TrainingOutcome {
            best_model_name: selected.name,
            best_score: selected.score,
            report,
            test_metrics,
            model: selected.model,
            model_path,
        })
    }
}
