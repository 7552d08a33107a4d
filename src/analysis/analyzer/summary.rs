//! Analyzer for plot summaries fed to the TF-IDF vectorizer.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (`\b[a-zA-Z]+\b`)
//! 2. LowercaseFilter
//! 3. StopFilter (English list)
//!
//! ```
//! use inaworld::analysis::analyzer::{Analyzer, SummaryAnalyzer};
//!
//! let analyzer = SummaryAnalyzer::new().unwrap();
//! let terms = analyzer.terms("A spy saves the world in 1964!").unwrap();
//! assert_eq!(terms, vec!["spy", "saves", "world"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// The analyzer used for summaries by the main pipeline.
pub struct SummaryAnalyzer {
    inner: PipelineAnalyzer,
}

impl SummaryAnalyzer {
    /// Create a summary analyzer with the English stop word list.
    pub fn new() -> Result<Self> {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Create a summary analyzer with a custom stop word filter.
    pub fn with_stop_filter(stop_filter: StopFilter) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(stop_filter))
            .with_name("summary");

        Ok(SummaryAnalyzer { inner: analyzer })
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for SummaryAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "summary"
    }
}

impl std::fmt::Debug for SummaryAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_analyzer() {
        let analyzer = SummaryAnalyzer::new().unwrap();

        let terms = analyzer
            .terms("The ROBOT falls in love with another robot, 2 times.")
            .unwrap();

        assert_eq!(terms, vec!["robot", "falls", "love", "robot", "times"]);
    }

    #[test]
    fn test_summary_analyzer_custom_stop_words() {
        let analyzer = SummaryAnalyzer::with_stop_filter(StopFilter::from_words(["robot"])).unwrap();

        let terms = analyzer.terms("The robot").unwrap();

        assert_eq!(terms, vec!["the"]);
        assert_eq!(analyzer.name(), "summary");
    }
}
