//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::cli::args::{InaworldArgs, OutputFormat};
use crate::error::Result;
use crate::evaluation::ClassificationReport;

/// Results that can be rendered for a terminal.
pub trait HumanOutput {
    /// Plain-text rendering, newline terminated.
    fn to_human(&self) -> String;
}

/// Result structure for the genres command.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenreCountsResult {
    pub source: String,
    pub examples: usize,
    pub genres: BTreeMap<String, usize>,
}

impl HumanOutput for GenreCountsResult {
    fn to_human(&self) -> String {
        let width = self
            .genres
            .keys()
            .map(|genre| genre.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} movies, {} genres ({})",
            self.examples,
            self.genres.len(),
            self.source
        );
        let _ = writeln!(out, "{}", "─".repeat(width + 8));

        let mut by_count: Vec<(&String, &usize)> = self.genres.iter().collect();
        by_count.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (genre, count) in by_count {
            let _ = writeln!(out, "{genre:<width$} {count:>7}");
        }
        out
    }
}

/// Result structure for the report command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResult {
    pub source: String,
    pub train_examples: usize,
    pub test_examples: usize,
    pub report: ClassificationReport,
}

impl HumanOutput for ReportResult {
    fn to_human(&self) -> String {
        format!(
            "Trained on {} movies, validated on {} ({})\n\n{}",
            self.train_examples, self.test_examples, self.source, self.report
        )
    }
}

/// Genres predicted for one summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct Prediction {
    pub summary: String,
    pub genres: Vec<String>,
}

/// Result structure for the predict command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predictions: Vec<Prediction>,
}

impl HumanOutput for PredictionResult {
    fn to_human(&self) -> String {
        let mut out = String::new();
        for (i, prediction) in self.predictions.iter().enumerate() {
            let genres = if prediction.genres.is_empty() {
                "(no genre)".to_string()
            } else {
                prediction.genres.join(", ")
            };
            let _ = writeln!(out, "{}. {}", i + 1, truncate(&prediction.summary, 60));
            let _ = writeln!(out, "   {genres}");
        }
        out
    }
}

/// Render a result in the requested format.
pub fn format_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &InaworldArgs,
) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                Ok(format!("{message}\n\n{}", result.to_human()))
            } else {
                Ok(result.to_human())
            }
        }
        OutputFormat::Json => {
            let mut json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            json.push('\n');
            Ok(json)
        }
    }
}

/// Print a result to stdout in the requested format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &InaworldArgs,
) -> Result<()> {
    print!("{}", format_result(message, result, args)?);
    Ok(())
}

/// Shorten text to at most `max_chars` characters, marking the cut.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
