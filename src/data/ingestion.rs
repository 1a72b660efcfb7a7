//! Data ingestion: read the source dataset, persist it and its seeded split

use crate::error::{Result, TrainerError};
use super::config::IngestionConfig;
use super::loader::{load_csv, save_csv};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

/// Row indices of a shuffled train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a seeded RNG and hold out `ceil(n_rows * test_size)`
/// rows for testing.
pub fn shuffle_split(n_rows: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    let n_test = (n_rows as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(TrainerError::SchemaMismatch(format!(
            "test_size {} on {} rows leaves an empty train or test set",
            test_size, n_rows
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        rows.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

/// Paths of the split files written by ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionArtifacts {
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct DataIngestion {
    config: IngestionConfig,
}

impl DataIngestion {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// Read the source CSV, write the raw copy plus train/test splits
    pub fn initiate_data_ingestion(&self) -> Result<IngestionArtifacts> {
        info!("Starting data ingestion");
        let config = &self.config;
        if !config.source_path.is_file() {
            return Err(TrainerError::MissingInput {
                path: config.source_path.clone(),
            });
        }
        config.validate()?;

        let mut df = load_csv(&config.source_path)?;
        info!(
            path = %config.source_path.display(),
            rows = df.height(),
            cols = df.width(),
            "Dataset read"
        );

        save_csv(&mut df, &config.raw_data_path)?;
        info!(path = %config.raw_data_path.display(), "Raw data saved");

        let split = shuffle_split(df.height(), config.test_size, config.random_state)?;
        let mut train = take_rows(&df, &split.train)?;
        let mut test = take_rows(&df, &split.test)?;

        save_csv(&mut train, &config.train_data_path)?;
        save_csv(&mut test, &config.test_data_path)?;
        info!(
            train_path = %config.train_data_path.display(),
            train_rows = train.height(),
            test_path = %config.test_data_path.display(),
            test_rows = test.height(),
            "Train and test splits saved"
        );

        info!("Data ingestion completed");
        Ok(IngestionArtifacts {
            train_data_path: config.train_data_path.clone(),
            test_data_path: config.test_data_path.clone(),
        })
    }
}
