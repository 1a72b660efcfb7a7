//! Training configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the model trainer writes the winning model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTrainerConfig {
    /// Path of the persisted model file
    pub trained_model_file_path: PathBuf,
}

impl Default for ModelTrainerConfig {
    fn default() -> Self {
        Self {
            trained_model_file_path: Path::new("artifacts").join("model.bin"),
        }
    }
}

impl ModelTrainerConfig {
    /// Place the model file inside `artifacts_dir`
    pub fn in_dir(artifacts_dir: impl AsRef<Path>) -> Self {
        Self {
            trained_model_file_path: artifacts_dir.as_ref().join("model.bin"),
        }
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.trained_model_file_path = path.into();
        self
    }
}
