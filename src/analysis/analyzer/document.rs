//! Alternate summary analyzer for experiments.
//!
//! Lowercases, drops punctuation, numbers, stop words and proper nouns, and
//! can optionally stem. It is not used by the training pipeline.

use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{
    AlphabeticFilter, LowercaseFilter, ProperNounFilter, StemFilter, StopFilter,
};
use crate::analysis::tokenizer::UnicodeWordTokenizer;
use crate::error::Result;

/// Word-level analyzer with proper-noun removal and optional stemming.
///
/// ```
/// use inaworld::analysis::analyzer::{Analyzer, DocumentAnalyzer};
///
/// let analyzer = DocumentAnalyzer::new();
/// let terms = analyzer.terms("Two droids meet Luke in 1977.").unwrap();
/// assert_eq!(terms, vec!["droids", "meet"]);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentAnalyzer {
    inner: PipelineAnalyzer,
    stemming: bool,
}

impl DocumentAnalyzer {
    /// Create a document analyzer without stemming.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Create a document analyzer that stems every surviving token.
    pub fn with_stemming() -> Self {
        Self::build(true)
    }

    fn build(stemming: bool) -> Self {
        // Proper nouns are detected from capitalization, so that filter runs
        // before lowercasing.
        let mut inner = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .add_filter(Arc::new(AlphabeticFilter::new()))
            .add_filter(Arc::new(ProperNounFilter::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .with_name("document");

        if stemming {
            inner = inner.add_filter(Arc::new(StemFilter::new()));
        }

        DocumentAnalyzer { inner, stemming }
    }

    /// Whether this analyzer stems tokens.
    pub fn is_stemming(&self) -> bool {
        self.stemming
    }

    /// Analyze every document in parallel, returning one term list per
    /// document in input order.
    pub fn tokenize_corpus<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<Vec<Vec<String>>> {
        documents
            .par_iter()
            .map(|document| self.terms(document.as_ref()))
            .collect()
    }
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for DocumentAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "document"
    }
}
