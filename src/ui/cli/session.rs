use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::presentation::TextChart;
use crate::tasks::TumorDetector;
use crate::ui::cli::drivers::PromptDriver;
use crate::ui::cli::report::describe_failure;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const PROMPT_TITLE: &str = "Upload MRI image:";
const PROMPT_HELP: &str = "Path to a .jpg / .jpeg / .png scan (leave blank to quit)";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub classified: u64,
    pub failed: u64,
}

/// Asks for scans one after another until the user leaves. A failed scan
/// prints an error and the session moves on to the next prompt.
pub fn run_session<D: PromptDriver, W: Write>(
    driver: &D,
    detector: &TumorDetector,
    chart: &TextChart,
    out: &mut W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    loop {
        let Some(answer) = driver.ask_string(PROMPT_TITLE, PROMPT_HELP, "")? else {
            break;
        };
        let answer = answer.trim();
        if answer.is_empty() {
            break;
        }

        let path = match validate_image_path(answer) {
            Ok(p) => p,
            Err(msg) => {
                writeln!(out, "✗ {msg}")?;
                continue;
            }
        };

        match detector.analyze_file(&path) {
            Ok(result) => {
                summary.classified += 1;
                writeln!(out, "{}", chart.render(&result))?;
            }
            Err(e) => {
                summary.failed += 1;
                writeln!(out, "✗ {}: {}", path.display(), describe_failure(&e))?;
            }
        }
    }

    Ok(summary)
}

pub fn validate_image_path(input: &str) -> Result<PathBuf, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    match p.extension().and_then(|e| e.to_str()) {
        Some(ext) if IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {}
        _ => return Err(format!("Expected a .{} file", IMAGE_EXTENSIONS.join(" / ."))),
    }
    Ok(p.to_path_buf())
}
