//! Binary indicator encoding of genre fields.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use sprs::{CsMat, TriMat};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::tokenizer::GenreTokenizer;
use crate::error::{InaworldError, Result};

/// Encodes raw genre fields as rows of a binary indicator matrix.
///
/// The vocabulary is every distinct genre phrase seen at fit time, sorted
/// lexicographically so that column indices are reproducible.
pub struct LabelVectorizer {
    /// Sorted genre vocabulary.
    vocabulary: Vec<String>,
    /// Genre -> column index.
    index: HashMap<String, usize>,
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for LabelVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl LabelVectorizer {
    /// Create a label vectorizer that parses genre fields.
    pub fn new() -> Self {
        Self::with_analyzer(Arc::new(
            PipelineAnalyzer::new(Arc::new(GenreTokenizer::new())).with_name("genre"),
        ))
    }

    /// Create a label vectorizer with a custom analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        LabelVectorizer {
            vocabulary: Vec::new(),
            index: HashMap::new(),
            analyzer,
        }
    }

    /// Learn the genre vocabulary.
    pub fn fit<S: AsRef<str>>(&mut self, genres: &[S]) -> Result<()> {
        if genres.is_empty() {
            return Err(InaworldError::EmptyCorpus);
        }

        let mut distinct = BTreeSet::new();
        for field in genres {
            distinct.extend(self.labels(field.as_ref())?);
        }

        if distinct.is_empty() {
            return Err(InaworldError::degenerate_vocabulary(
                "no genre labels found in any record",
            ));
        }

        self.vocabulary = distinct.into_iter().collect();
        self.index = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, genre)| (genre.clone(), i))
            .collect();

        Ok(())
    }

    /// Encode genre fields against the fitted vocabulary. Unknown genres are
    /// ignored.
    pub fn transform<S: AsRef<str>>(&self, genres: &[S]) -> Result<CsMat<u8>> {
        let mut tri = TriMat::new((genres.len(), self.vocabulary.len()));

        for (row, field) in genres.iter().enumerate() {
            let columns: BTreeSet<usize> = self
                .labels(field.as_ref())?
                .iter()
                .filter_map(|genre| self.index.get(genre).copied())
                .collect();
            for col in columns {
                tri.add_triplet(row, col, 1u8);
            }
        }

        Ok(tri.to_csr())
    }

    /// Fit and encode in one pass.
    pub fn fit_transform<S: AsRef<str>>(&mut self, genres: &[S]) -> Result<CsMat<u8>> {
        self.fit(genres)?;
        self.transform(genres)
    }

    /// The sorted genre vocabulary; column `i` of the matrix is `vocabulary()[i]`.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Parsed, non-empty genre phrases of one field.
    fn labels(&self, field: &str) -> Result<Vec<String>> {
        Ok(self
            .analyzer
            .terms(field)?
            .into_iter()
            .filter(|genre| !genre.is_empty())
            .collect())
    }
}

impl Default for LabelVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
