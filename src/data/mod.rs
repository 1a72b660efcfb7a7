//! Dataset ingestion and loading
//!
//! Reads the source CSV, persists raw/train/test copies with a seeded split,
//! and turns split files back into numeric arrays for training.

mod config;
mod ingestion;
mod loader;

pub use config::IngestionConfig;
pub use ingestion::{shuffle_split, DataIngestion, IngestionArtifacts, SplitIndices};
pub use loader::{frame_to_array, load_array, load_csv, save_csv};
