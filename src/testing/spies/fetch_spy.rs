use crate::core::errors::Result;
use crate::models::ArtifactFetcher;
use std::fs;
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct FetchSpyHandle(Arc<AtomicU64>);
impl FetchSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Writes a canned body to the destination and counts how often it ran.
pub struct FetchSpy {
    count: Arc<AtomicU64>,
    body: Vec<u8>,
}

impl FetchSpy {
    pub fn new(body: Vec<u8>) -> (Self, FetchSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: counter.clone(),
                body,
            },
            FetchSpyHandle(counter),
        )
    }
}

impl ArtifactFetcher for FetchSpy {
    fn fetch(&self, _url: &str, dest: &Path) -> Result<u64> {
        self.count.fetch_add(1, Ordering::Relaxed);
        fs::write(dest, &self.body)?;
        Ok(self.body.len() as u64)
    }
}
