//! Error types for the training pipeline

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, TrainerError>;

/// Pipeline stage an error escaped from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingestion,
    DataLoading,
    Training,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingestion => write!(f, "data ingestion"),
            Stage::DataLoading => write!(f, "data loading"),
            Stage::Training => write!(f, "model training"),
        }
    }
}

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Model '{model}' failed during fit or scoring: {reason}")]
    FitOrScore { model: String, reason: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<TrainerError>,
    },
}

impl TrainerError {
    /// Wrap this error with the stage it escaped from
    pub fn in_stage(self, stage: Stage) -> Self {
        TrainerError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Innermost error, looking through stage wrappers
    pub fn root(&self) -> &TrainerError {
        match self {
            TrainerError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Outermost stage this error was attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TrainerError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<polars::error::PolarsError> for TrainerError {
    fn from(err: polars::error::PolarsError) -> Self {
        TrainerError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for TrainerError {
    fn from(err: serde_json::Error) -> Self {
        TrainerError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for TrainerError {
    fn from(err: bincode::Error) -> Self {
        TrainerError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TrainerError {
    fn from(err: ndarray::ShapeError) -> Self {
        TrainerError::SchemaMismatch(err.to_string())
    }
}
