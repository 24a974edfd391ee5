use crate::core::errors::{ClassifierError, Result};
use crate::core::tensor::ImageTensor;
use crate::models::ImageClassifier;
use cpu_time::ThreadTime;

/// How far the output mass may drift from 1 before it is reported.
pub const PROBABILITY_SUM_TOLERANCE: f32 = 1e-3;

/// Runs forward passes and checks the contract around them.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceEngine;

impl InferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Feeds `tensor` through `model` and returns one score per class.
    ///
    /// The model is expected to end in a softmax. Negative scores and a total
    /// that drifts from 1 are logged, not rejected. Non-finite scores are
    /// rejected.
    pub fn predict(&self, model: &dyn ImageClassifier, tensor: &ImageTensor) -> Result<Vec<f32>> {
        if tensor.shape() != model.input_shape() {
            return Err(ClassifierError::ShapeMismatch {
                expected: model.input_shape().to_vec(),
                actual: tensor.shape().to_vec(),
            });
        }

        let started = ThreadTime::now();
        let probabilities = model.forward(tensor)?;
        tracing::debug!(
            cpu_ms = started.elapsed().as_secs_f64() * 1e3,
            "forward pass finished"
        );

        if probabilities.len() != model.output_width() {
            return Err(ClassifierError::ShapeMismatch {
                expected: vec![1, model.output_width()],
                actual: vec![1, probabilities.len()],
            });
        }
        if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
            return Err(ClassifierError::InvalidProbabilities { index });
        }

        if let Some(drift) = distribution_drift(&probabilities) {
            tracing::warn!(%drift, "model output is not a probability distribution");
        }

        Ok(probabilities)
    }
}

/// Why finite `probabilities` are not a distribution, if they are not.
fn distribution_drift(probabilities: &[f32]) -> Option<String> {
    if let Some(index) = probabilities.iter().position(|p| *p < 0.0) {
        return Some(format!("negative score at index {index}"));
    }
    let total: f32 = probabilities.iter().sum();
    ((total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE).then(|| format!("scores sum to {total}"))
}
