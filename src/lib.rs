//! Tabular Trainer - ingestion and model selection for tabular regression
//!
//! This crate reads a numeric CSV dataset, persists a seeded train/test
//! split, fits a fixed family of linear regressors and keeps the one with
//! the highest R² on the held-out rows.
//!
//! # Modules
//!
//! - [`data`] - Dataset ingestion, split persistence, CSV to array loading
//! - [`training`] - Linear models, candidate registry, evaluation and selection
//! - [`export`] - Model file serialization with metadata
//! - [`pipeline`] - End-to-end run with stage-tagged errors
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

pub mod data;
pub mod training;
pub mod export;
pub mod pipeline;

pub mod cli;

pub use error::{Result, Stage, TrainerError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Result, Stage, TrainerError};

    pub use crate::data::{DataIngestion, IngestionArtifacts, IngestionConfig};

    pub use crate::training::{
        evaluate_models, select_best_model, CandidateModel, ModelRegistry, ModelReport,
        ModelTrainer, ModelTrainerConfig, Regressor, TrainTestSplit, TrainingOutcome,
    };

    pub use crate::export::{load_object, save_object, ModelMetadata};

    pub use crate::pipeline::{PipelineConfig, TrainingPipeline};
}
