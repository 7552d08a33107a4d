//! Error types for the inaworld library.
//!
//! All fallible operations return [`InaworldError`]. The first five variants
//! form the domain taxonomy of the genre pipeline; callers are expected to
//! branch on the variant, never on the rendered message.
//!
//! # Examples
//!
//! ```
//! use inaworld::error::{InaworldError, Result};
//!
//! fn predict_before_training() -> Result<Vec<String>> {
//!     Err(InaworldError::untrained("predict"))
//! }
//!
//! match predict_before_training() {
//!     Err(InaworldError::Untrained { operation }) => assert_eq!(operation, "predict"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for inaworld operations.
#[derive(Error, Debug)]
pub enum InaworldError {
    /// A vectorizer or filter was handed zero documents.
    #[error("Empty corpus: at least one document is required")]
    EmptyCorpus,

    /// Every candidate token was filtered out of a vocabulary.
    #[error("Degenerate vocabulary: {reason}")]
    DegenerateVocabulary { reason: String },

    /// A stratification class has fewer than two members.
    #[error(
        "Insufficient class members: class {class} has only {members} member(s), at least 2 are required for a stratified split"
    )]
    InsufficientClassMembers { class: String, members: usize },

    /// A session operation was called before `load()`.
    #[error("Session not loaded: `{operation}` requires load() to have completed")]
    Unloaded { operation: String },

    /// A session operation was called before `train()`.
    #[error("Session not trained: `{operation}` requires train() to have completed")]
    Untrained { operation: String },

    /// I/O errors (reading the corpus or configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values outside their documented range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Two co-indexed arrays disagree on their length.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A binary learner failed to fit.
    #[error("Training error: {0}")]
    Training(String),

    /// The worker pool for parallel fitting could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with InaworldError.
pub type Result<T> = std::result::Result<T, InaworldError>;

impl InaworldError {
    /// Create a new degenerate vocabulary error.
    pub fn degenerate_vocabulary<S: Into<String>>(reason: S) -> Self {
        InaworldError::DegenerateVocabulary {
            reason: reason.into(),
        }
    }

    /// Create a new unloaded-session error for the named operation.
    pub fn unloaded<S: Into<String>>(operation: S) -> Self {
        InaworldError::Unloaded {
            operation: operation.into(),
        }
    }

    /// Create a new untrained-session error for the named operation.
    pub fn untrained<S: Into<String>>(operation: S) -> Self {
        InaworldError::Untrained {
            operation: operation.into(),
        }
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        InaworldError::InvalidConfig(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        InaworldError::Analysis(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        InaworldError::Training(msg.into())
    }

    /// Create a new shape mismatch error.
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        InaworldError::ShapeMismatch { expected, actual }
    }
}
