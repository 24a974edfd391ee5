use crate::core::errors::Result;
use crate::models::classifier::ImageClassifier;
use std::path::Path;
use std::sync::Arc;

/// Deserializes a cached artifact into a ready-to-query classifier.
pub trait ArtifactLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn ImageClassifier>>;
}
