//! # inaworld
//!
//! Multi-label movie genre classification from plot summaries.
//!
//! ## Features
//!
//! - CSV corpus loading with pre-filtering of unusable records
//! - Genre frequency filtering that keeps labels and examples aligned
//! - Reproducible, optionally stratified train/validation splits
//! - TF-IDF text vectorization over a pluggable analysis pipeline
//! - One-vs-rest linear classifiers fitted in parallel
//! - Per-label and averaged precision, recall and F1
//!
//! ## Example
//!
//! ```no_run
//! use inaworld::prelude::*;
//!
//! let config = SessionConfig::default().with_seed(42);
//! let mut session = ModelSession::from_csv(config, "movies.csv")?;
//! session.load()?;
//! session.train()?;
//! println!("{}", session.report()?);
//! println!("{:?}", session.predict("A robot falls in love with another robot.")?);
//! # Ok::<(), inaworld::error::InaworldError>(())
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod filter;
pub mod pipeline;
pub mod session;
pub mod split;
pub mod vectorize;

pub mod prelude {
    pub use crate::config::{ClassifierConfig, ClassifierKind, SessionConfig};
    pub use crate::corpus::{CorpusSource, CsvSource, InMemorySource, MovieRecord};
    pub use crate::error::{InaworldError, Result};
    pub use crate::evaluation::ClassificationReport;
    pub use crate::session::{ModelSession, SessionState};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
