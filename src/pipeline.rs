//! End-to-end run: ingestion, then training

use crate::data::{load_array, DataIngestion, IngestionConfig};
use crate::error::{Result, Stage, TrainerError};
use crate::training::{ModelTrainer, ModelTrainerConfig, TrainingOutcome};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info, info_span};

/// Configuration of a full pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub trainer: ModelTrainerConfig,
}

impl PipelineConfig {
    /// Conventional layout with every artifact under `artifacts_dir`
    pub fn in_dir(artifacts_dir: impl AsRef<Path>) -> Self {
        Self {
            ingestion: IngestionConfig::in_dir(artifacts_dir.as_ref()),
            trainer: ModelTrainerConfig::in_dir(artifacts_dir.as_ref()),
        }
    }

    pub fn with_source(mut self, path: impl AsRef<Path>) -> Self {
        self.ingestion.source_path = path.as_ref().to_path_buf();
        self
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TrainerError::MissingInput {
                path: path.to_path_buf(),
            });
        }
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.ingestion.validate()
    }
}

/// Runs data ingestion followed by model training
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: PipelineConfig,
}

impl TrainingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every stage; failures are tagged with the stage they came from
    pub fn run(&self) -> Result<TrainingOutcome> {
        let span = info_span!("pipeline");
        let _guard = span.enter();

        let artifacts = DataIngestion::new(self.config.ingestion.clone())
            .initiate_data_ingestion()
            .map_err(|e| fail(e, Stage::Ingestion))?;

        let (train, test) = load_array(&artifacts.train_data_path)
            .and_then(|train| Ok((train, load_array(&artifacts.test_data_path)?)))
            .map_err(|e| fail(e, Stage::DataLoading))?;
        info!(
            train_shape = ?train.dim(),
            test_shape = ?test.dim(),
            "Split arrays loaded"
        );

        let outcome = ModelTrainer::new(self.config.trainer.clone())
            .initiate_model_training(&train, &test)
            .map_err(|e| fail(e, Stage::Training))?;

        info!(
            model = %outcome.best_model_name,
            r2 = outcome.best_score,
            "Pipeline finished"
        );
        Ok(outcome)
    }
}

fn fail(err: TrainerError, stage: Stage) -> TrainerError {
    error!(stage = %stage, error = %err, "Pipeline stage failed");
    err.in_stage(stage)
}
