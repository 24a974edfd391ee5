use crate::core::app_config::{AppConfig, ENV_MODEL_URL};
use crate::core::class_label::ClassLabel;
use crate::core::errors::{ClassifierError, Result};
use crate::models::classifier::ImageClassifier;
use crate::models::fetcher::{ArtifactFetcher, HttpFetcher, looks_like_html, read_head};
use crate::models::loader::ArtifactLoader;
use crate::models::onnx_classifier::OnnxLoader;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Owns the classifier artifact: fetches it into the local cache on first
/// use, loads it once, and hands out the same instance afterwards.
pub struct ModelProvider {
    model_url: Option<String>,
    model_path: PathBuf,
    fetcher: Box<dyn ArtifactFetcher>,
    loader: Box<dyn ArtifactLoader>,
    loaded: Mutex<Option<Arc<dyn ImageClassifier>>>,
}

impl ModelProvider {
    /// Without a URL only an artifact already at `model_path` can be used.
    pub fn new(
        model_url: Option<String>,
        model_path: impl Into<PathBuf>,
        fetcher: Box<dyn ArtifactFetcher>,
        loader: Box<dyn ArtifactLoader>,
    ) -> Self {
        Self {
            model_url,
            model_path: model_path.into(),
            fetcher,
            loader,
            loaded: Mutex::new(None),
        }
    }

    /// HTTP fetcher and ONNX loader wired from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(config.download_timeout())?;
        Ok(Self::new(
            config.model_url.clone(),
            config.model_path.clone(),
            Box::new(fetcher),
            Box::new(OnnxLoader),
        ))
    }

    #[inline]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[inline]
    pub fn model_url(&self) -> Option<&str> {
        self.model_url.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot().is_some()
    }

    /// Returns the loaded model, fetching and loading it on the first call.
    /// A failed attempt leaves the slot empty so a later call can try again.
    pub fn get_model(&self) -> Result<Arc<dyn ImageClassifier>> {
        let mut slot = self.slot();
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let path = self.ensure_artifact()?;
        let model = self.loader.load(&path)?;
        ClassLabel::validate_output_width(model.output_width()).map_err(|e| {
            ClassifierError::ModelLoad {
                path: path.clone(),
                reason: format!("incompatible with class table: {e}"),
            }
        })?;

        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Makes sure the artifact is cached locally without loading it.
    pub fn prefetch(&self) -> Result<PathBuf> {
        let _guard = self.slot();
        self.ensure_artifact()
    }

    fn ensure_artifact(&self) -> Result<PathBuf> {
        if artifact_is_cached(&self.model_path)? {
            tracing::debug!(path = %self.model_path.display(), "using cached model artifact");
            return Ok(self.model_path.clone());
        }
        let url = self.model_url.as_deref().ok_or_else(|| {
            ClassifierError::Config(format!(
                "no model artifact at {} and no download URL configured; set {ENV_MODEL_URL} or pass --model-url",
                self.model_path.display()
            ))
        })?;
        if let Some(parent) = self.model_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        self.fetcher.fetch(url, &self.model_path)?;
        Ok(self.model_path.clone())
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<dyn ImageClassifier>>> {
        // Only written after a successful load, so a poisoned value is still valid.
        self.loaded.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Zero-length files and saved web pages count as absent.
fn artifact_is_cached(path: &Path) -> Result<bool> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if !meta.is_file() || meta.len() == 0 {
        return Ok(false);
    }
    if looks_like_html(&read_head(fs::File::open(path)?)?) {
        tracing::warn!(path = %path.display(), "cached artifact is an HTML page; fetching again");
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::UnreachableFetcher;
    use crate::testing::spies::{FetchSpy, LoadSpy};
    use crate::testing::stubs::{CannedResponse, FixedOutputClassifier, StaticHttpServer};

    const URL: &str = "https://artifacts.test/model.onnx";

    fn provider_in(
        dir: &Path,
        fetcher: Box<dyn ArtifactFetcher>,
        loader: Box<dyn ArtifactLoader>,
    ) -> ModelProvider {
        ModelProvider::new(Some(URL.into()), dir.join("models").join("model.onnx"), fetcher, loader)
    }

    #[test]
    fn downloads_once_and_returns_the_same_instance() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"onnx-bytes".to_vec());
        let (loader, loads) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = provider_in(dir.path(), Box::new(fetcher), Box::new(loader));

        assert!(!provider.is_loaded());
        let first = provider.get_model().unwrap();
        let second = provider.get_model().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetches.count(), 1);
        assert_eq!(loads.count(), 1);
        assert!(provider.is_loaded());
        assert_eq!(fs::read(provider.model_path()).unwrap(), b"onnx-bytes");
    }

    #[test]
    fn skips_download_when_artifact_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"fresh".to_vec());
        let (loader, loads) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = provider_in(dir.path(), Box::new(fetcher), Box::new(loader));

        fs::create_dir_all(provider.model_path().parent().unwrap()).unwrap();
        fs::write(provider.model_path(), b"cached").unwrap();

        provider.get_model().unwrap();
        assert_eq!(fetches.count(), 0);
        assert_eq!(loads.count(), 1);
        assert_eq!(fs::read(provider.model_path()).unwrap(), b"cached");
    }

    #[test]
    fn empty_cached_file_is_downloaded_again() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"fresh".to_vec());
        let (loader, _) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = provider_in(dir.path(), Box::new(fetcher), Box::new(loader));

        fs::create_dir_all(provider.model_path().parent().unwrap()).unwrap();
        fs::write(provider.model_path(), b"").unwrap();

        provider.get_model().unwrap();
        assert_eq!(fetches.count(), 1);
    }

    #[test]
    fn network_failure_is_model_unavailable_and_retryable() {
        let dir = tempfile::tempdir().unwrap();
        let (loader, loads) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = provider_in(dir.path(), Box::new(UnreachableFetcher), Box::new(loader));

        for _ in 0..2 {
            assert!(matches!(
                provider.get_model(),
                Err(ClassifierError::ModelUnavailable { .. })
            ));
        }
        assert_eq!(loads.count(), 0);
        assert!(!provider.is_loaded());
        assert!(!provider.model_path().exists());
    }

    #[test]
    fn wrong_output_width_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, _) = FetchSpy::new(b"onnx".to_vec());
        let (loader, _) = LoadSpy::new(FixedOutputClassifier::new(vec![0.5, 0.5]));
        let provider = provider_in(dir.path(), Box::new(fetcher), Box::new(loader));

        assert!(matches!(
            provider.get_model(),
            Err(ClassifierError::ModelLoad { .. })
        ));
        assert!(!provider.is_loaded());
    }

    #[test]
    fn prefetch_caches_without_loading() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"onnx".to_vec());
        let (loader, loads) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = provider_in(dir.path(), Box::new(fetcher), Box::new(loader));

        let path = provider.prefetch().unwrap();
        assert_eq!(path, provider.model_path());
        provider.prefetch().unwrap();
        assert_eq!(fetches.count(), 1);
        assert_eq!(loads.count(), 0);
    }

    #[test]
    fn concurrent_first_calls_share_one_load() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"onnx".to_vec());
        let (loader, loads) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = Arc::new(provider_in(dir.path(), Box::new(fetcher), Box::new(loader)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = Arc::clone(&provider);
                std::thread::spawn(move || p.get_model().map(|_| ()))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }
        assert_eq!(fetches.count(), 1);
        assert_eq!(loads.count(), 1);
    }

    #[test]
    fn cached_html_page_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"onnx".to_vec());
        let (loader, _) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = provider_in(dir.path(), Box::new(fetcher), Box::new(loader));

        fs::create_dir_all(provider.model_path().parent().unwrap()).unwrap();
        fs::write(provider.model_path(), b"<html><body>Google Drive</body></html>").unwrap();

        provider.get_model().unwrap();
        assert_eq!(fetches.count(), 1);
        assert_eq!(fs::read(provider.model_path()).unwrap(), b"onnx");
    }

    #[test]
    fn interstitial_download_stays_unavailable_and_uncached() {
        let page = "<html><body>Google Drive can't scan this file for viruses.</body></html>";
        let server = StaticHttpServer::serve(vec![
            CannedResponse::new("text/html", page),
            CannedResponse::new("text/html", page),
        ])
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_url: Some(server.url("/uc?export=download&id=abc")),
            model_path: dir.path().join("models").join("model.onnx"),
            ..AppConfig::default()
        };
        let provider = ModelProvider::from_config(&config).unwrap();

        for _ in 0..2 {
            assert!(matches!(
                provider.get_model(),
                Err(ClassifierError::ModelUnavailable { .. })
            ));
            assert!(!provider.model_path().exists());
        }
        assert_eq!(server.requests().len(), 2);
    }

    #[test]
    fn missing_url_without_cache_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, fetches) = FetchSpy::new(b"onnx".to_vec());
        let (loader, _) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = ModelProvider::new(
            None,
            dir.path().join("model.onnx"),
            Box::new(fetcher),
            Box::new(loader),
        );

        match provider.get_model() {
            Err(ClassifierError::Config(msg)) => assert!(msg.contains(ENV_MODEL_URL)),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("model loaded without an artifact"),
        }
        assert_eq!(fetches.count(), 0);
    }

    #[test]
    fn cached_artifact_needs_no_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        fs::write(&path, b"onnx").unwrap();
        let (fetcher, fetches) = FetchSpy::new(Vec::new());
        let (loader, loads) = LoadSpy::new(FixedOutputClassifier::uniform());
        let provider = ModelProvider::new(None, &path, Box::new(fetcher), Box::new(loader));

        provider.get_model().unwrap();
        assert_eq!(fetches.count(), 0);
        assert_eq!(loads.count(), 1);
    }
}
