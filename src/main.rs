use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use schemars::schema_for;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use tumorscope::core::{AppConfig, ClassLabel};
use tumorscope::models::ModelProvider;
use tumorscope::presentation::{PredictionResult, TextChart};
use tumorscope::tasks::TumorDetector;
use tumorscope::ui::cli::args::{Cli, Command, OutputFormat, PredictArgs};
use tumorscope::ui::cli::drivers::InquireDriver;
use tumorscope::ui::cli::report::FileReport;
use tumorscope::ui::cli::session::run_session;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_RED: &str = "\x1b[31m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.model.resolve().context("invalid configuration")?;

    match cli.command {
        Some(Command::Predict(args)) => predict(&config, args),
        Some(Command::Fetch) => fetch(&config),
        Some(Command::Classes) => {
            for (i, label) in ClassLabel::ALL.iter().enumerate() {
                println!("{i}\t{label}");
            }
            Ok(())
        }
        Some(Command::Schema) => {
            let schema = schema_for!(PredictionResult);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        None => interactive(&config),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the quiet default.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn predict(config: &AppConfig, args: PredictArgs) -> Result<()> {
    let detector = TumorDetector::from_config(config).context("failed to set up detector")?;
    let chart = TextChart::new(args.bar_width, !args.no_color);

    let reports: Vec<FileReport> = args
        .images
        .iter()
        .map(|path| FileReport::new(path, &detector.analyze_file(path)))
        .collect();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            let mut stdout = io::stdout().lock();
            for report in &reports {
                let name = if args.no_color {
                    report.file.clone()
                } else {
                    format!("{BOLD}{FG_CYAN}{}{RESET}", report.file)
                };
                writeln!(stdout, "{name}")?;
                match (&report.prediction, &report.error) {
                    (Some(prediction), _) => writeln!(stdout, "{}", chart.render(prediction))?,
                    (None, Some(error)) if args.no_color => writeln!(stdout, "✗ {error}\n")?,
                    (None, Some(error)) => writeln!(stdout, "{FG_RED}✗ {error}{RESET}\n")?,
                    (None, None) => {}
                }
            }
        }
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        bail!("{failed} of {} images could not be classified", reports.len());
    }
    Ok(())
}

fn fetch(config: &AppConfig) -> Result<()> {
    let provider = ModelProvider::from_config(config).context("failed to set up model provider")?;
    let path = provider
        .prefetch()
        .with_context(|| {
            format!(
                "failed to fetch model from {}",
                provider.model_url().unwrap_or("<no URL configured>")
            )
        })?;
    println!("model artifact cached at {}", path.display());
    Ok(())
}

fn interactive(config: &AppConfig) -> Result<()> {
    let detector = TumorDetector::from_config(config).context("failed to set up detector")?;

    println!("{BOLD}{FG_CYAN}▶ Brain Tumor Detection{RESET}");
    println!(
        "{DIM}model={}{RESET}  {}",
        config.model_path.display(),
        timestamp_now()
    );
    println!(
        "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
    );

    let mut stdout = io::stdout();
    let summary = run_session(&InquireDriver, &detector, &TextChart::default(), &mut stdout)
        .context("interactive session failed")?;

    println!(
        "{DIM}classified={}  failed={}{RESET}",
        summary.classified, summary.failed
    );
    Ok(())
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
