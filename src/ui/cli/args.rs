use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand, ValueHint};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::core::AppConfig;
use crate::presentation::DEFAULT_BAR_WIDTH;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Classify brain MRI scans into tumor categories"
)]
pub struct Cli {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one or more images without the interactive prompt
    Predict(PredictArgs),
    /// Download the model artifact into the local cache
    Fetch,
    /// List the class table in model output order
    Classes,
    /// Print the JSON Schema of the prediction output
    Schema,
}

#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Remote location of the model artifact
    #[arg(long, global = true, value_name = "URL")]
    pub model_url: Option<String>,

    /// Local cache path of the model artifact
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub model_path: Option<PathBuf>,

    /// Reject images larger than this many bytes
    #[arg(
        long,
        global = true,
        value_name = "BYTES",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub max_upload_bytes: Option<u64>,
}

impl ModelArgs {
    /// Flags take precedence over environment, which overrides defaults.
    pub fn apply(&self, mut config: AppConfig) -> Result<AppConfig> {
        if let Some(url) = &self.model_url {
            config.model_url = Some(url.clone());
        }
        if let Some(path) = &self.model_path {
            config.model_path = path.clone();
        }
        if let Some(limit) = self.max_upload_bytes {
            config.max_upload_bytes = limit;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn resolve(&self) -> Result<AppConfig> {
        self.apply(AppConfig::from_env()?)
    }
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// JPEG or PNG images to classify
    #[arg(required = true, value_name = "IMAGE", value_hint = ValueHint::FilePath)]
    pub images: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT", value_parser = parse_output_format)]
    pub format: OutputFormat,

    /// Width of the probability bars, in cells
    #[arg(
        long,
        default_value_t = DEFAULT_BAR_WIDTH,
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from),
    )]
    pub bar_width: usize,

    /// Disable ANSI colors in text output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn parse_output_format(input: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(input.trim()).map_err(|_| format!("unknown format '{}'", input.trim()))
}
