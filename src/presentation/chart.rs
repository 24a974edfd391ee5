use crate::presentation::prediction::PredictionResult;
use std::fmt::Write;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_GREEN: &str = "\x1b[32m";
const FG_BLUE: &str = "\x1b[34m";
const FG_CYAN: &str = "\x1b[36m";

pub const DEFAULT_BAR_WIDTH: usize = 30;

/// Terminal rendering of a [`PredictionResult`]: headline, confidence bar
/// and a horizontal bar chart over `[0, 1]` in fixed class order.
#[derive(Debug, Clone, Copy)]
pub struct TextChart {
    bar_width: usize,
    color: bool,
}

impl Default for TextChart {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            color: true,
        }
    }
}

impl TextChart {
    pub fn new(bar_width: usize, color: bool) -> Self {
        Self {
            bar_width: bar_width.max(1),
            color,
        }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn render(&self, result: &PredictionResult) -> String {
        let mut out = String::new();
        let label = result.predicted_label.to_string();

        let _ = writeln!(
            out,
            "{} {}",
            self.paint(DIM, "Prediction:"),
            self.paint(&format!("{BOLD}{FG_GREEN}"), &label)
        );
        let _ = writeln!(
            out,
            "{} {}",
            self.paint(DIM, "Confidence:"),
            self.paint(BOLD, &percent(result.confidence))
        );
        let _ = writeln!(out, "{}", progress_bar(result.confidence as f64, self.bar_width));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint(&format!("{BOLD}{FG_CYAN}"), "Class Probabilities"));

        let name_w = result
            .per_class
            .iter()
            .map(|c| c.label.to_string().len())
            .max()
            .unwrap_or(0);

        for c in &result.per_class {
            let name = format!("{:<name_w$}", c.label.to_string());
            let cells = bar(c.probability as f64, self.bar_width);
            let cells = if c.label == result.predicted_label {
                self.paint(FG_GREEN, &cells)
            } else {
                self.paint(FG_BLUE, &cells)
            };
            let _ = writeln!(out, "  {name}  {cells} {:>7}", percent(c.probability));
        }

        out
    }
}

pub fn percent(p: f32) -> String {
    if p.is_nan() {
        "NaN".into()
    } else {
        format!("{:.2}%", p * 100.0)
    }
}

fn filled_cells(ratio: f64, width: usize) -> usize {
    if ratio.is_finite() {
        (ratio.clamp(0.0, 1.0) * width as f64).round() as usize
    } else {
        0
    }
}

fn bar(ratio: f64, width: usize) -> String {
    let filled = filled_cells(ratio, width);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled))
    )
}

fn progress_bar(ratio: f64, width: usize) -> String {
    format!("[{}] {:>3.0}%", bar(ratio, width), ratio.clamp(0.0, 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::ResultPresenter;

    fn sample() -> PredictionResult {
        ResultPresenter::new()
            .present(&[0.05, 0.10, 0.80, 0.05])
            .unwrap()
    }

    #[test]
    fn plain_rendering_has_headline_and_one_row_per_class() {
        let text = TextChart::new(10, false).render(&sample());
        assert!(text.contains("Prediction: No Tumor"));
        assert!(text.contains("Confidence: 80.00%"));
        assert!(!text.contains('\x1b'));

        let rows: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("Class Probabilities"))
            .skip(1)
            .collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].trim_start().starts_with("Glioma"));
        assert!(rows[1].trim_start().starts_with("Meningioma"));
        assert!(rows[2].trim_start().starts_with("No Tumor"));
        assert!(rows[3].trim_start().starts_with("Pituitary"));
        assert!(rows[2].contains("████████░░"));
        assert!(rows[2].ends_with("80.00%"));
        assert!(rows[0].ends_with("5.00%"));
    }

    #[test]
    fn colored_rendering_uses_ansi_styles() {
        let text = TextChart::default().render(&sample());
        assert!(text.contains(FG_GREEN));
        assert!(text.contains(RESET));
    }

    #[test]
    fn bars_clamp_to_unit_range() {
        assert_eq!(bar(1.7, 4), "████");
        assert_eq!(bar(-0.2, 4), "░░░░");
        assert_eq!(bar(f64::NAN, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "[██░░]  50%");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(percent(0.123456), "12.35%");
        assert_eq!(percent(1.0), "100.00%");
    }
}
