use crate::core::class_label::ClassLabel;
use crate::core::errors::Result;
use crate::core::tensor::{ImageTensor, MODEL_INPUT_SHAPE};
use crate::models::ImageClassifier;
use strum::EnumCount;

/// Returns the same scores for every input.
pub struct FixedOutputClassifier {
    scores: Vec<f32>,
    input_shape: Vec<usize>,
}

impl FixedOutputClassifier {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            input_shape: MODEL_INPUT_SHAPE.to_vec(),
        }
    }

    pub fn uniform() -> Self {
        Self::new(vec![1.0 / ClassLabel::COUNT as f32; ClassLabel::COUNT])
    }

    pub fn with_input_shape(mut self, shape: &[usize]) -> Self {
        self.input_shape = shape.to_vec();
        self
    }
}

impl ImageClassifier for FixedOutputClassifier {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_width(&self) -> usize {
        self.scores.len()
    }

    fn forward(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
        Ok(self.scores.clone())
    }
}
