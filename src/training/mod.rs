//! Model training module
//!
//! Fits every registered regressor on the training arrays, scores each on the
//! held-out arrays with R², and keeps the best one:
//! - Linear models (OLS, Lasso, Ridge, ElasticNet)
//! - Candidate registry with fresh instances per run
//! - Evaluation loop and deterministic selection

mod config;
mod evaluator;
mod models;
mod registry;
mod selector;
mod trainer;
pub mod linear_models;
pub mod metrics;

pub use config::ModelTrainerConfig;
pub use evaluator::{evaluate_models, ModelReport, TrainTestSplit};
pub use linear_models::{
    ElasticNetRegression, LassoRegression, LinearParams, LinearRegression, RidgeRegression,
};
pub use metrics::{r2_score, RegressionMetrics};
pub use models::{CandidateModel, Regressor};
pub use registry::{Candidates, ModelRegistry};
pub use selector::{best_entry, select_best_model, SelectedModel};
pub use trainer::{split_features_and_target, ModelTrainer, TrainingOutcome};
