//! Configuration for a model session.
//!
//! Every threshold that drives loading, filtering, splitting and fitting is
//! carried by [`SessionConfig`] and handed to the session at construction.
//!
//! ```
//! use inaworld::config::{ClassifierKind, SessionConfig};
//!
//! let config = SessionConfig::default()
//!     .with_min_genre_count(5)
//!     .with_seed(42)
//!     .with_classifier_kind(ClassifierKind::LogisticRegression)
//!     .with_classifier_param("c", 0.5);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.test_size, 0.25);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InaworldError, Result};

/// Default minimum number of examples a genre needs to be kept.
pub const DEFAULT_MIN_GENRE_COUNT: usize = 2;

/// Default fraction of examples held out for validation.
pub const DEFAULT_TEST_SIZE: f64 = 0.25;

/// Default document-frequency ceiling for summary terms.
pub const DEFAULT_MAX_DOC_FREQ: f64 = 0.25;

/// Binary classifier used for each genre column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Linear support vector machine with squared hinge loss.
    #[default]
    LinearSvc,

    /// L2-regularized logistic regression.
    LogisticRegression,
}

impl ClassifierKind {
    /// Name used in configuration files and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::LinearSvc => "linear_svc",
            ClassifierKind::LogisticRegression => "logistic_regression",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = InaworldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "linear_svc" | "svc" => Ok(ClassifierKind::LinearSvc),
            "logistic_regression" | "logistic" => Ok(ClassifierKind::LogisticRegression),
            other => Err(InaworldError::invalid_config(format!(
                "unknown classifier '{other}'"
            ))),
        }
    }
}

/// Classifier choice plus its keyword parameters.
///
/// `params` is forwarded untouched to the classifier, which checks the keys
/// it recognizes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Which binary classifier to fit per genre.
    pub kind: ClassifierKind,

    /// Keyword parameters for the classifier.
    pub params: BTreeMap<String, f64>,
}

impl ClassifierConfig {
    /// Create a classifier configuration with no parameters.
    pub fn new(kind: ClassifierKind) -> Self {
        ClassifierConfig {
            kind,
            params: BTreeMap::new(),
        }
    }

    /// Set a keyword parameter.
    pub fn with_param<S: Into<String>>(mut self, key: S, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Configuration for a [`ModelSession`](crate::session::ModelSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Genres seen in fewer examples than this are dropped.
    pub min_genre_count: usize,

    /// Fraction of examples held out for validation, in (0, 1).
    pub test_size: f64,

    /// Whether the train/validation split preserves label proportions.
    pub stratify_split: bool,

    /// Terms found in more than this fraction of summaries are ignored, in (0, 1].
    pub max_doc_freq: f64,

    /// Seed for the split shuffle. `None` draws from the OS.
    pub seed: Option<u64>,

    /// Worker threads for fitting per-genre classifiers.
    /// If None, uses the number of CPU cores.
    pub n_jobs: Option<usize>,

    /// The binary classifier and its parameters.
    pub classifier: ClassifierConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            min_genre_count: DEFAULT_MIN_GENRE_COUNT,
            test_size: DEFAULT_TEST_SIZE,
            stratify_split: false,
            max_doc_freq: DEFAULT_MAX_DOC_FREQ,
            seed: None,
            n_jobs: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.min_genre_count < 1 {
            return Err(InaworldError::invalid_config(
                "min_genre_count must be at least 1",
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(InaworldError::invalid_config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if !(self.max_doc_freq > 0.0 && self.max_doc_freq <= 1.0) {
            return Err(InaworldError::invalid_config(format!(
                "max_doc_freq must be in (0, 1], got {}",
                self.max_doc_freq
            )));
        }
        if self.n_jobs == Some(0) {
            return Err(InaworldError::invalid_config("n_jobs must be positive"));
        }
        Ok(())
    }

    /// Number of worker threads to use for fitting.
    pub fn effective_jobs(&self) -> usize {
        self.n_jobs.unwrap_or_else(num_cpus::get)
    }

    /// Set the minimum genre count.
    pub fn with_min_genre_count(mut self, min_genre_count: usize) -> Self {
        self.min_genre_count = min_genre_count;
        self
    }

    /// Set the validation fraction.
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Enable or disable the stratified split.
    pub fn with_stratify_split(mut self, stratify_split: bool) -> Self {
        self.stratify_split = stratify_split;
        self
    }

    /// Set the document-frequency ceiling.
    pub fn with_max_doc_freq(mut self, max_doc_freq: f64) -> Self {
        self.max_doc_freq = max_doc_freq;
        self
    }

    /// Set the split seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of worker threads.
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    /// Replace the classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the classifier kind, keeping its parameters.
    pub fn with_classifier_kind(mut self, kind: ClassifierKind) -> Self {
        self.classifier.kind = kind;
        self
    }

    /// Set one classifier keyword parameter.
    pub fn with_classifier_param<S: Into<String>>(mut self, key: S, value: f64) -> Self {
        self.classifier.params.insert(key.into(), value);
        self
    }
}
