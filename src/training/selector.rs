//! Best-model selection

use crate::error::{Result, TrainerError};
use super::evaluator::ModelReport;
use super::models::CandidateModel;
use super::registry::Candidates;

/// The winning trained model of a run
#[derive(Debug, Clone)]
pub struct SelectedModel {
    pub name: String,
    pub score: f64,
    pub model: CandidateModel,
}

/// Name and score of the highest-scoring entry.
///
/// Uses a strict `>` so the first entry in report order wins a tie.
pub fn best_entry(report: &ModelReport) -> Result<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (name, score) in report.iter() {
        match best {
            Some((_, best_score)) if !(score > best_score) => {}
            _ => best = Some((name, score)),
        }
    }

    best.ok_or_else(|| {
        TrainerError::InvalidState("model report is empty, nothing to select".to_string())
    })
}

/// Pick the best model and take it out of the trained candidates
pub fn select_best_model(report: &ModelReport, mut models: Candidates) -> Result<SelectedModel> {
    let (name, score) = best_entry(report)?;
    let model = models.shift_remove(name).ok_or_else(|| {
        TrainerError::InvalidState(format!(
            "best model '{}' has no trained instance",
            name
        ))
    })?;

    Ok(SelectedModel {
        name: name.to_string(),
        score,
        model,
    })
}
