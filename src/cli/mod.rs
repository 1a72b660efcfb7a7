//! Command-line interface for the training pipeline

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::error::Result;
use crate::pipeline::{PipelineConfig, TrainingPipeline};
use crate::training::{ModelTrainerConfig, TrainingOutcome};
use crate::data::IngestionConfig;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(46)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tabular-trainer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ingest a tabular dataset, train linear regressors and keep the best")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON pipeline configuration; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source CSV file (label in the last column)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Directory for raw/train/test splits and the model file
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// Fraction of rows held out for testing
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Build the pipeline configuration from the config file and flags
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = &self.artifacts {
            let source = config.ingestion.source_path.clone();
            let (test_size, seed) = (config.ingestion.test_size, config.ingestion.random_state);
            config.ingestion = IngestionConfig::in_dir(dir)
                .with_source(source)
                .with_test_size(test_size)
                .with_random_state(seed);
            config.trainer = ModelTrainerConfig::in_dir(dir);
        }
        if let Some(data) = &self.data {
            config.ingestion.source_path = data.clone();
        }
        if let Some(test_size) = self.test_size {
            config.ingestion.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.ingestion.random_state = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run the pipeline described by `cli` and print a summary
pub fn cmd_run(cli: &Cli) -> Result<TrainingOutcome> {
    let config = cli.pipeline_config()?;

    section("Training");
    println!("  {:<12} {}", muted("Data"), config.ingestion.source_path.display());
    println!("  {:<12} {}", muted("Test size"), config.ingestion.test_size);
    println!("  {:<12} {}", muted("Seed"), config.ingestion.random_state);

    let start = Instant::now();
    let outcome = TrainingPipeline::new(config).run()?;
    print_summary(&outcome, start.elapsed());
    Ok(outcome)
}

fn print_summary(outcome: &TrainingOutcome, elapsed: std::time::Duration) {
    println!();
    println!("  {:<24} {:>10}", muted("Model"), muted("R²"));
    println!("  {}", dim(&"─".repeat(46)));
    for (name, score) in outcome.report.iter() {
        let row = format!("  {:<24} {:>10.4}", name, score);
        if name == outcome.best_model_name {
            println!("{}", row.white().bold());
        } else {
            println!("{}", row);
        }
    }
    println!("  {}", dim(&"─".repeat(46)));

    println!();
    println!(
        "  {} {} {} {:.4}",
        ok("best"),
        outcome.best_model_name.white().bold(),
        muted("R²:"),
        outcome.best_score
    );
    let m = &outcome.test_metrics;
    println!(
        "  {:<12} {:.4}  {} {:.4}  {} {}",
        muted("RMSE"),
        m.rmse,
        muted("MAE"),
        m.mae,
        muted("n"),
        m.n_samples
    );
    println!("  {:<12} {}", muted("Saved to"), outcome.model_path.display());
    println!("  {:<12} {:.2?}", muted("Time"), elapsed);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "tabular-trainer",
            "--data",
            "input.csv",
            "--artifacts",
            "out",
            "--test-size",
            "0.25",
            "--seed",
            "7",
        ]);
        let config = cli.pipeline_config().unwrap();

        assert_eq!(config.ingestion.source_path, Path::new("input.csv"));
        assert_eq!(config.ingestion.train_data_path, Path::new("out").join("train.csv"));
        assert_eq!(config.trainer.trained_model_file_path, Path::new("out").join("model.bin"));
        assert_eq!(config.ingestion.test_size, 0.25);
        assert_eq!(config.ingestion.random_state, 7);
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = Cli::parse_from(["tabular-trainer"]);
        assert_eq!(cli.pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_bad_test_size_rejected() {
        let cli = Cli::parse_from(["tabular-trainer", "--test-size", "2"]);
        assert!(cli.pipeline_config().is_err());
    }
}
