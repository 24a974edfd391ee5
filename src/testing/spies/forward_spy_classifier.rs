use crate::core::errors::Result;
use crate::core::tensor::{ImageTensor, MODEL_INPUT_SHAPE};
use crate::models::ImageClassifier;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct ForwardSpyHandle(Arc<AtomicU64>);
impl ForwardSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct ForwardSpyClassifier {
    count: Arc<AtomicU64>,
    scores: Vec<f32>,
}

impl ForwardSpyClassifier {
    pub fn new(scores: Vec<f32>) -> (Self, ForwardSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: counter.clone(),
                scores,
            },
            ForwardSpyHandle(counter),
        )
    }
}

impl ImageClassifier for ForwardSpyClassifier {
    fn input_shape(&self) -> &[usize] {
        &MODEL_INPUT_SHAPE
    }

    fn output_width(&self) -> usize {
        self.scores.len()
    }

    fn forward(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(self.scores.clone())
    }
}
