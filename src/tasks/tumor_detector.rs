use crate::core::app_config::AppConfig;
use crate::core::errors::Result;
use crate::inference::InferenceEngine;
use crate::models::ModelProvider;
use crate::preprocessing::ImageNormalizer;
use crate::presentation::{PredictionResult, ResultPresenter};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Image in, prediction out: normalize, run the model, present.
///
/// The model is fetched and loaded lazily by the first request that gets
/// past decoding, and reused for every later one.
pub struct TumorDetector {
    provider: ModelProvider,
    normalizer: ImageNormalizer,
    engine: InferenceEngine,
    presenter: ResultPresenter,
}

impl TumorDetector {
    pub fn new(provider: ModelProvider, normalizer: ImageNormalizer) -> Self {
        Self {
            provider,
            normalizer,
            engine: InferenceEngine::new(),
            presenter: ResultPresenter::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            ModelProvider::from_config(config)?,
            ImageNormalizer::new(config.max_upload_bytes),
        ))
    }

    #[inline]
    pub fn provider(&self) -> &ModelProvider {
        &self.provider
    }

    pub fn analyze(&self, raw_image_bytes: &[u8]) -> Result<PredictionResult> {
        let started = Instant::now();
        let tensor = self.normalizer.normalize(raw_image_bytes)?;
        let model = self.provider.get_model()?;
        let probabilities = self.engine.predict(model.as_ref(), &tensor)?;
        let result = self.presenter.present(&probabilities)?;

        tracing::info!(
            label = %result.predicted_label,
            confidence = result.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image classified"
        );
        Ok(result)
    }

    pub fn analyze_file(&self, path: &Path) -> Result<PredictionResult> {
        let _span = tracing::info_span!("analyze_file", path = %path.display()).entered();
        let bytes = fs::read(path)?;
        self.analyze(&bytes)
    }
}
