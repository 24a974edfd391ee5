use crate::core::errors::{ClassifierError, Result};
use crate::presentation::PredictionResult;
use serde::Serialize;
use std::path::Path;

/// Outcome for one input file, as emitted by `predict --format json`.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(path: &Path, outcome: &Result<PredictionResult>) -> Self {
        let file = path.display().to_string();
        match outcome {
            Ok(prediction) => Self {
                file,
                prediction: Some(prediction.clone()),
                error: None,
            },
            Err(e) => Self {
                file,
                prediction: None,
                error: Some(describe_failure(e)),
            },
        }
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Message shown to the user for a failed scan. Broken contracts between
/// pipeline stages are logged at `error` and flagged as a bug.
pub fn describe_failure(err: &ClassifierError) -> String {
    if err.is_contract_violation() {
        tracing::error!(error = %err, "pipeline contract violated");
        format!("internal error (this is a bug, please report it): {err}")
    } else {
        err.to_string()
    }
}
