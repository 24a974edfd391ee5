use crate::core::class_label::ClassLabel;
use crate::core::errors::{ClassifierError, Result};
use crate::presentation::prediction::{ClassProbability, PredictionResult};
use strum::EnumCount;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPresenter;

impl ResultPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn present(&self, probabilities: &[f32]) -> Result<PredictionResult> {
        if probabilities.len() != ClassLabel::COUNT {
            return Err(ClassifierError::DimensionMismatch {
                expected: ClassLabel::COUNT,
                actual: probabilities.len(),
            });
        }

        let predicted_index = argmax(probabilities);
        let per_class = ClassLabel::ALL
            .iter()
            .zip(probabilities)
            .map(|(&label, &probability)| ClassProbability { label, probability })
            .collect();

        Ok(PredictionResult {
            predicted_label: ClassLabel::ALL[predicted_index],
            confidence: probabilities[predicted_index],
            per_class,
        })
    }
}

/// Index of the largest value; the first one wins ties. NaN never wins.
/// Returns 0 for an empty slice.
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best_idx = i;
            best = v;
        }
    }
    best_idx
}
