//! Integration test: Full pipeline (ingest → split → train → persist → reload)

use ndarray::Array2;
use polars::prelude::*;
use std::path::Path;
use tabular_trainer::data::{load_array, load_csv, save_csv};
use tabular_trainer::export::load_object;
use tabular_trainer::pipeline::{PipelineConfig, TrainingPipeline};
use tabular_trainer::training::{CandidateModel, ModelRegistry, Regressor};
use tabular_trainer::{Stage, TrainerError};
use tempfile::tempdir;

/// 100 rows, three predictors, label linear in them plus small deterministic noise
fn create_regression_dataset() -> DataFrame {
    let n = 100;
    let mut carat = Vec::with_capacity(n);
    let mut depth = Vec::with_capacity(n);
    let mut table = Vec::with_capacity(n);
    let mut price = Vec::with_capacity(n);

    for i in 0..n {
        let x1 = i as f64;
        let x2 = ((i * 7) % 13) as f64;
        let x3 = ((i * i) % 17) as f64 * 0.5;
        let noise = (((i * 31) % 11) as f64 - 5.0) * 0.01;
        carat.push(x1);
        depth.push(x2);
        table.push(x3);
        price.push(50.0 + 3.0 * x1 - 2.0 * x2 + 1.5 * x3 + noise);
    }

    df!(
        "carat" => &carat,
        "depth" => &depth,
        "table" => &table,
        "price" => &price
    )
    .unwrap()
}

fn write_source(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("data").join("dataset.csv");
    let mut df = create_regression_dataset();
    save_csv(&mut df, &path).unwrap();
    path
}

#[test]
fn test_pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path());
    let artifacts = dir.path().join("artifacts");

    let config = PipelineConfig::in_dir(&artifacts).with_source(&source);
    let outcome = TrainingPipeline::new(config).run().unwrap();

    // Split files
    let raw = load_csv(artifacts.join("raw.csv")).unwrap();
    let train = load_csv(artifacts.join("train.csv")).unwrap();
    let test = load_csv(artifacts.join("test.csv")).unwrap();
    assert_eq!(raw.height(), 100);
    assert_eq!(train.height(), 70);
    assert_eq!(test.height(), 30);

    // Every source row lands in exactly one side
    let mut ids: Vec<i64> = train
        .column("carat")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .chain(
            test.column("carat")
                .unwrap()
                .as_materialized_series()
                .cast(&DataType::Float64)
                .unwrap()
                .f64()
                .unwrap()
                .into_iter(),
        )
        .map(|v| v.unwrap() as i64)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..100).collect::<Vec<i64>>());

    // Report covers every candidate and the winner holds the maximum
    let names: Vec<&str> = outcome.report.names().collect();
    assert_eq!(names, ModelRegistry::NAMES.to_vec());
    let max = outcome
        .report
        .iter()
        .map(|(_, s)| s)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(outcome.best_score, max);
    assert_eq!(outcome.report.get(&outcome.best_model_name), Some(max));
    assert!(outcome.best_score > 0.99);

    // Persisted model reloads and predicts a held-out row closely
    assert!(outcome.model_path.exists());
    let (model, metadata): (CandidateModel, _) = load_object(&outcome.model_path).unwrap();
    assert_eq!(metadata.name, outcome.best_model_name);
    assert_eq!(metadata.n_features, 3);

    let test_array = load_array(artifacts.join("test.csv")).unwrap();
    let row = test_array.row(0);
    let x = Array2::from_shape_vec((1, 3), row.iter().take(3).copied().collect()).unwrap();
    let predicted = model.predict(&x).unwrap()[0];
    let actual = row[3];
    assert!(
        (predicted - actual).abs() <= 0.05 * actual.abs(),
        "predicted {} vs actual {}",
        predicted,
        actual
    );
}

#[test]
fn test_pipeline_split_is_reproducible() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path());

    let run = |name: &str| {
        let artifacts = dir.path().join(name);
        let config = PipelineConfig::in_dir(&artifacts).with_source(&source);
        TrainingPipeline::new(config).run().unwrap();
        std::fs::read(artifacts.join("train.csv")).unwrap()
    };

    assert_eq!(run("first"), run("second"));
}

#[test]
fn test_pipeline_missing_source() {
    let dir = tempdir().unwrap();
    let artifacts = dir.path().join("artifacts");
    let config = PipelineConfig::in_dir(&artifacts).with_source(dir.path().join("nope.csv"));

    let err = TrainingPipeline::new(config).run().unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Ingestion));
    assert!(matches!(err.root(), TrainerError::MissingInput { .. }));
    assert!(!artifacts.join("model.bin").exists());
    assert!(err.to_string().starts_with("data ingestion failed"));
}

#[test]
fn test_pipeline_rejects_text_columns() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("dataset.csv");
    let mut df = df!(
        "cut" => (0..20).map(|i| if i % 2 == 0 { "Ideal" } else { "Premium" }).collect::<Vec<_>>(),
        "carat" => (0..20).map(|i| i as f64).collect::<Vec<_>>(),
        "price" => (0..20).map(|i| 2.0 * i as f64 + 1.0).collect::<Vec<_>>()
    )
    .unwrap();
    save_csv(&mut df, &source).unwrap();

    let artifacts = dir.path().join("artifacts");
    let config = PipelineConfig::in_dir(&artifacts).with_source(&source);
    let err = TrainingPipeline::new(config).run().unwrap_err();

    assert_eq!(err.stage(), Some(Stage::DataLoading));
    assert!(matches!(err.root(), TrainerError::Data(_)));
    assert!(!artifacts.join("model.bin").exists());
}
