//! Ingestion configuration

use crate::error::{Result, TrainerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where ingestion reads the dataset from, where it writes the splits, and
/// how it splits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Source dataset; the label must be the last column
    pub source_path: PathBuf,
    pub raw_data_path: PathBuf,
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
    /// Fraction of rows held out for testing
    pub test_size: f64,
    /// Seed for the row shuffle
    pub random_state: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self::in_dir("artifacts")
    }
}

impl IngestionConfig {
    /// Default configuration with all split files placed in `artifacts_dir`
    pub fn in_dir(artifacts_dir: impl AsRef<Path>) -> Self {
        let dir = artifacts_dir.as_ref();
        Self {
            source_path: Path::new("notebooks").join("data").join("Gemstone.csv"),
            raw_data_path: dir.join("raw.csv"),
            train_data_path: dir.join("train.csv"),
            test_data_path: dir.join("test.csv"),
            test_size: 0.3,
            random_state: 42,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainerError::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}
