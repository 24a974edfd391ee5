use crate::core::errors::{ClassifierError, Result};
use crate::models::ArtifactFetcher;
use std::path::Path;

#[derive(Default)]
pub struct UnreachableFetcher;

impl ArtifactFetcher for UnreachableFetcher {
    fn fetch(&self, url: &str, _dest: &Path) -> Result<u64> {
        Err(ClassifierError::ModelUnavailable {
            url: url.to_string(),
            reason: "network is unreachable".into(),
        })
    }
}
