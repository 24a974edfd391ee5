use crate::core::errors::Result;
use crate::models::{ArtifactLoader, ImageClassifier};
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct LoadSpyHandle(Arc<AtomicU64>);
impl LoadSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Hands out a prepared classifier and counts load attempts.
pub struct LoadSpy {
    count: Arc<AtomicU64>,
    model: Arc<dyn ImageClassifier>,
}

impl LoadSpy {
    pub fn new<C: ImageClassifier + 'static>(model: C) -> (Self, LoadSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: counter.clone(),
                model: Arc::new(model),
            },
            LoadSpyHandle(counter),
        )
    }
}

impl ArtifactLoader for LoadSpy {
    fn load(&self, _path: &Path) -> Result<Arc<dyn ImageClassifier>> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(Arc::clone(&self.model))
    }
}
