//! Command line argument parsing for the inaworld CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ClassifierKind, SessionConfig};

/// inaworld - predict movie genres from plot summaries
#[derive(Parser, Debug, Clone)]
#[command(name = "inaworld")]
#[command(about = "Train and evaluate a multi-label genre classifier on movie plot summaries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct InaworldArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Session configuration file (JSON); command line options override it
    #[arg(short, long, value_name = "CONFIG_FILE", env = "INAWORLD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl InaworldArgs {
    /// Effective verbosity: 0 when quiet, otherwise 1 plus the `-v` count.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Default log filter directive for the effective verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load a corpus and print the number of movies per genre
    Genres(GenresArgs),

    /// Train on a corpus and print the validation report
    Report(TrainingArgs),

    /// Train on a corpus and predict genres for new summaries
    Predict(PredictArgs),
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Genres(_) => "genres",
            Command::Report(_) => "report",
            Command::Predict(_) => "predict",
        }
    }
}

/// Options shared by every command that loads a corpus.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// CSV file with `summary` and `genres` columns
    #[arg(short, long, value_name = "CSV_FILE")]
    pub data: PathBuf,

    /// Drop genres found in fewer movies than this
    #[arg(long, value_name = "N")]
    pub min_genre_count: Option<usize>,
}

impl DataArgs {
    /// Apply the loading overrides to a configuration.
    pub fn apply(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(min_genre_count) = self.min_genre_count {
            config.min_genre_count = min_genre_count;
        }
        config
    }
}

/// Arguments for the genres command
#[derive(Args, Debug, Clone)]
pub struct GenresArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

/// Arguments for commands that train a model
#[derive(Args, Debug, Clone)]
pub struct TrainingArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Fraction of movies held out for validation
    #[arg(long, value_name = "FRACTION")]
    pub test_size: Option<f64>,

    /// Preserve label-combination proportions in the split
    #[arg(long, overrides_with = "no_stratify")]
    pub stratify: bool,

    /// Split without stratification, even if the config file enables it
    #[arg(long = "no-stratify", overrides_with = "stratify")]
    pub no_stratify: bool,

    /// Ignore terms found in more than this fraction of summaries
    #[arg(long = "max-df", value_name = "FRACTION")]
    pub max_doc_freq: Option<f64>,

    /// Seed for a reproducible split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for fitting (default: number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Binary classifier fitted per genre
    #[arg(long, value_name = "KIND")]
    pub classifier: Option<ClassifierKind>,

    /// Classifier parameter, repeatable (e.g. --param c=0.5)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, f64)>,
}

impl TrainingArgs {
    /// The stratification choice made on the command line, if any. The last
    /// of `--stratify` and `--no-stratify` wins.
    pub fn stratify_override(&self) -> Option<bool> {
        match (self.stratify, self.no_stratify) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Apply the training overrides to a configuration.
    pub fn apply(&self, config: SessionConfig) -> SessionConfig {
        let mut config = self.data.apply(config);
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(stratify) = self.stratify_override() {
            config.stratify_split = stratify;
        }
        if let Some(max_doc_freq) = self.max_doc_freq {
            config.max_doc_freq = max_doc_freq;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.jobs.is_some() {
            config.n_jobs = self.jobs;
        }
        if let Some(kind) = self.classifier {
            config.classifier.kind = kind;
        }
        for (key, value) in &self.params {
            config.classifier.params.insert(key.clone(), *value);
        }
        config
    }
}

/// Arguments for the predict command
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub training: TrainingArgs,

    /// Plot summaries to classify
    #[arg(value_name = "SUMMARY", required = true)]
    pub summaries: Vec<String>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in `{raw}`"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for `{key}`: {e}"))?;
    Ok((key.to_string(), value))
}
