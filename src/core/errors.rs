use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model artifact unavailable from {url}: {reason}")]
    ModelUnavailable { url: String, reason: String },

    #[error("failed to load model artifact {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("tensor shape {actual:?} does not match model input {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("expected {expected} class probabilities, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced non-finite probability at index {index}")]
    InvalidProbabilities { index: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// True for failures caused by a broken contract between pipeline stages
    /// rather than by user input or the environment.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. } | Self::DimensionMismatch { .. }
        )
    }
}
