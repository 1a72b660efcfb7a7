//! Model file format
//!
//! A model file is a bincode-encoded envelope holding the metadata, the
//! bincode bytes of the model itself and a SHA-256 digest of those bytes.
//! bincode writes `f64` values bit-for-bit, so a reloaded model reproduces
//! the exact predictions of the instance that was saved.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, TrainerError};

/// Descriptive information stored next to a persisted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Registry name of the model
    pub name: String,
    /// Model family
    pub model_type: String,
    /// Held-out R² that won the selection
    pub score: f64,
    /// Number of predictor columns the model expects
    pub n_features: usize,
    /// Scores of every candidate in the run, in evaluation order
    pub scores: IndexMap<String, f64>,
    pub hyperparameters: IndexMap<String, String>,
    /// Version of the crate that wrote the file
    pub crate_version: String,
    pub trained_at: DateTime<Utc>,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_type: "unknown".to_string(),
            score: f64::NAN,
            n_features: 0,
            scores: IndexMap::new(),
            hyperparameters: IndexMap::new(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: Utc::now(),
        }
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = model_type.into();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    pub fn with_scores(mut self, scores: IndexMap<String, f64>) -> Self {
        self.scores = scores;
        self
    }

    pub fn add_hyperparameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hyperparameters.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelEnvelope {
    magic: [u8; 4],
    format_version: u32,
    metadata: ModelMetadata,
    model_data: Vec<u8>,
    /// Hex-encoded SHA-256 of `model_data`
    checksum: String,
}

impl ModelEnvelope {
    const MAGIC: [u8; 4] = *b"TTRM";
    const VERSION: u32 = 1;

    fn new(metadata: ModelMetadata, model_data: Vec<u8>) -> Self {
        Self {
            magic: Self::MAGIC,
            format_version: Self::VERSION,
            checksum: compute_sha256(&model_data),
            metadata,
            model_data,
        }
    }

    fn verify(&self) -> Result<()> {
        if self.magic != Self::MAGIC {
            return Err(TrainerError::Serialization(
                "not a model file (bad magic bytes)".to_string(),
            ));
        }
        if self.format_version != Self::VERSION {
            return Err(TrainerError::Serialization(format!(
                "unsupported model format version {}",
                self.format_version
            )));
        }
        if compute_sha256(&self.model_data) != self.checksum {
            return Err(TrainerError::Serialization(
                "checksum verification failed, file may be corrupted".to_string(),
            ));
        }
        Ok(())
    }
}

fn compute_sha256(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Persist `model` at `path`, creating parent directories and replacing any
/// existing file.
pub fn save_object<M: Serialize>(
    path: impl AsRef<Path>,
    model: &M,
    metadata: ModelMetadata,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let model_data = bincode::serialize(model)?;
    let envelope = ModelEnvelope::new(metadata, model_data);

    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, &envelope)?;
    writer.flush()?;

    debug!(path = %path.display(), bytes = envelope.model_data.len(), "Model file written");
    Ok(())
}

/// Load a model written by [`save_object`]
pub fn load_object<M: DeserializeOwned>(path: impl AsRef<Path>) -> Result<(M, ModelMetadata)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TrainerError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let envelope: ModelEnvelope = bincode::deserialize_from(reader)?;
    envelope.verify()?;

    let model: M = bincode::deserialize(&envelope.model_data)?;
    Ok((model, envelope.metadata))
}
