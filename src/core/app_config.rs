use crate::core::errors::{ClassifierError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_MODEL_URL: &str = "TUMORSCOPE_MODEL_URL";
pub const ENV_MODEL_PATH: &str = "TUMORSCOPE_MODEL_PATH";
pub const ENV_MAX_UPLOAD_BYTES: &str = "TUMORSCOPE_MAX_UPLOAD_BYTES";

pub const DEFAULT_MODEL_PATH: &str = "models/model.onnx";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// Unset by default. Without it only an artifact already at
    /// `model_path` can be used.
    #[serde(default)]
    #[schemars(
        title = "Model URL",
        description = "Remote location the artifact is fetched from on first use"
    )]
    pub model_url: Option<String>,

    #[schemars(
        with = "String",
        title = "Model path",
        description = "Local cache path of the artifact",
        extend("format"="path","x-file"=true,"x-must-exist"=false)
    )]
    pub model_path: PathBuf,

    #[schemars(
        title = "Max upload bytes",
        description = "Images larger than this are rejected before decoding",
        range(min = 1)
    )]
    pub max_upload_bytes: u64,

    #[serde(default = "default_download_timeout_secs")]
    #[schemars(
        title = "Download timeout",
        description = "Overall timeout of the artifact download, in seconds",
        range(min = 1)
    )]
    pub download_timeout_secs: u64,
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_url: None,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays values from `lookup`, which maps variable names to values.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_MODEL_URL) {
            self.model_url = Some(url);
        }
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_MAX_UPLOAD_BYTES) {
            self.max_upload_bytes = raw.trim().parse().map_err(|_| {
                ClassifierError::Config(format!(
                    "{ENV_MAX_UPLOAD_BYTES} must be a positive integer, got '{raw}'"
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(ClassifierError::Config("model_url cannot be empty".into()));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ClassifierError::Config("model_path cannot be empty".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ClassifierError::Config(
                "max_upload_bytes must be > 0".into(),
            ));
        }
        if self.download_timeout_secs == 0 {
            return Err(ClassifierError::Config(
                "download_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
