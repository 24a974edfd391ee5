use crate::core::errors::Result;
use crate::core::tensor::ImageTensor;

/// A loaded, read-only image classification model.
pub trait ImageClassifier: Send + Sync {
    /// Shape of the single tensor the model accepts, batch dimension first.
    fn input_shape(&self) -> &[usize];

    /// Number of scores the model emits per sample.
    fn output_width(&self) -> usize;

    /// Runs one forward pass. Implementations may assume `tensor` already
    /// matches `input_shape`.
    fn forward(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;
}
