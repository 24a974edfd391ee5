use crate::core::class_label::ClassLabel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassProbability {
    pub label: ClassLabel,
    #[schemars(range(min = 0.0, max = 1.0))]
    pub probability: f32,
}

/// Outcome of classifying one image. `per_class` is always in
/// `ClassLabel::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResult {
    #[schemars(title = "Predicted label", description = "Class with the highest probability")]
    pub predicted_label: ClassLabel,

    #[schemars(
        title = "Confidence",
        description = "Probability of the predicted class",
        range(min = 0.0, max = 1.0)
    )]
    pub confidence: f32,

    #[schemars(
        title = "Per-class probabilities",
        description = "One entry per class, in fixed class order"
    )]
    pub per_class: Vec<ClassProbability>,
}

impl PredictionResult {
    pub fn probabilities(&self) -> impl Iterator<Item = f32> + '_ {
        self.per_class.iter().map(|c| c.probability)
    }

    pub fn probability_of(&self, label: ClassLabel) -> Option<f32> {
        self.per_class
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.probability)
    }
}

impl Display for PredictionResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "prediction={}, confidence={:.2}%",
            self.predicted_label,
            self.confidence * 100.0
        )?;
        for c in &self.per_class {
            write!(f, ", {}={:.4}", c.label, c.probability)?;
        }
        Ok(())
    }
}
