mod classifier;
mod fetcher;
mod loader;
mod onnx_classifier;
mod provider;

pub use classifier::ImageClassifier;
pub use fetcher::{ArtifactFetcher, HttpFetcher};
pub use loader::ArtifactLoader;
pub use onnx_classifier::{OnnxClassifier, OnnxLoader};
pub use provider::ModelProvider;
