//! TF-IDF vectorizer for plot summaries.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::analysis::analyzer::{Analyzer, SummaryAnalyzer};
use crate::error::{InaworldError, Result};

/// TF-IDF vectorizer for text feature extraction.
///
/// Weights are raw term counts times the smoothed inverse document frequency
/// `ln((1 + n) / (1 + df)) + 1`, and every row is scaled to unit L2 norm.
/// Terms that occur in more than `max_doc_freq * n` training documents are
/// left out of the vocabulary.
pub struct TfIdfVectorizer {
    /// Vocabulary: word -> index mapping.
    vocabulary: HashMap<String, usize>,
    /// Vocabulary terms in column order (sorted).
    terms: Vec<String>,
    /// Inverse document frequency for each column.
    idf: Vec<f64>,
    /// Total number of documents seen during training.
    n_documents: usize,
    /// Document-frequency ceiling as a fraction of the corpus.
    max_doc_freq: f64,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("max_doc_freq", &self.max_doc_freq)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a vectorizer with the summary analyzer and the given
    /// document-frequency ceiling.
    pub fn new(max_doc_freq: f64) -> Result<Self> {
        Ok(Self::with_analyzer(
            Arc::new(SummaryAnalyzer::new()?),
            max_doc_freq,
        ))
    }

    /// Create a new TF-IDF vectorizer with the specified analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>, max_doc_freq: f64) -> Self {
        Self {
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
            n_documents: 0,
            max_doc_freq,
            analyzer,
        }
    }

    /// Fit the vectorizer on training documents. The vocabulary is frozen
    /// until the next call.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(InaworldError::EmptyCorpus);
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        // Count document frequencies
        for doc in documents {
            let unique_tokens: HashSet<String> =
                self.analyzer.terms(doc.as_ref())?.into_iter().collect();
            for token in unique_tokens {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(InaworldError::degenerate_vocabulary(
                "documents contain only stop words or no alphabetic tokens",
            ));
        }

        let n_documents = documents.len();
        let max_doc_count = self.max_doc_freq * n_documents as f64;
        let candidates = document_frequency.len();

        let mut kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df as f64 <= max_doc_count)
            .collect();

        if kept.is_empty() {
            return Err(InaworldError::degenerate_vocabulary(format!(
                "no terms remain after removing terms found in more than {:.0}% of documents",
                self.max_doc_freq * 100.0
            )));
        }

        kept.sort_by(|a, b| a.0.cmp(&b.0));

        // IDF = log((N + 1) / (df + 1)) + 1
        self.idf = kept
            .iter()
            .map(|(_, df)| ((n_documents as f64 + 1.0) / (*df as f64 + 1.0)).ln() + 1.0)
            .collect();
        self.terms = kept.into_iter().map(|(term, _)| term).collect();
        self.vocabulary = self
            .terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        self.n_documents = n_documents;

        debug!(
            n_documents,
            candidates,
            vocabulary_size = self.terms.len(),
            "fitted tf-idf vocabulary"
        );

        Ok(())
    }

    /// Transform documents into L2-normalized TF-IDF rows. Terms outside the
    /// fitted vocabulary are dropped.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<CsMat<f64>> {
        let mut tri = TriMat::new((documents.len(), self.terms.len()));

        for (row, doc) in documents.iter().enumerate() {
            // Count term frequencies
            let mut tf: BTreeMap<usize, f64> = BTreeMap::new();
            for token in self.analyzer.terms(doc.as_ref())? {
                if let Some(&idx) = self.vocabulary.get(&token) {
                    *tf.entry(idx).or_insert(0.0) += 1.0;
                }
            }

            // Apply IDF
            for (idx, count) in tf.iter_mut() {
                *count *= self.idf[*idx];
            }

            let norm = tf.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (idx, weight) in tf {
                    tri.add_triplet(row, idx, weight / norm);
                }
            }
        }

        Ok(tri.to_csr())
    }

    /// Fit on the documents and transform them.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<CsMat<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Vocabulary terms in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Inverse document frequency per column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Document-frequency ceiling.
    pub fn max_doc_freq(&self) -> f64 {
        self.max_doc_freq
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        !self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "A spy saves the world from a villain.",
            "A robot falls in love with another robot.",
            "Cowboys ride horses across the desert.",
            "A detective hunts a killer in the city.",
            "Pirates sail the sea looking for treasure.",
        ]
    }

    #[test]
    fn test_tfidf_vectorizer() {
        let mut vectorizer = TfIdfVectorizer::new(1.0).unwrap();

        let matrix = vectorizer.fit_transform(&corpus()).unwrap();

        assert_eq!(matrix.rows(), 5);
        assert_eq!(matrix.cols(), vectorizer.vocabulary_size());
        assert!(vectorizer.vocabulary().windows(2).all(|w| w[0] < w[1]));
        assert!(vectorizer.vocabulary().contains(&"robot".to_string()));
        assert!(!vectorizer.vocabulary().contains(&"the".to_string()));

        for row in matrix.outer_iterator() {
            let norm: f64 = row.iter().map(|(_, &v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_idf_and_term_weighting() {
        let documents = vec!["robot robot love", "robot spy"];
        let mut vectorizer = TfIdfVectorizer::new(1.0).unwrap();

        let matrix = vectorizer.fit_transform(&documents).unwrap();

        assert_eq!(vectorizer.vocabulary(), &["love", "robot", "spy"]);
        // robot occurs in both documents: idf = ln(3/3) + 1 = 1
        assert!((vectorizer.idf()[1] - 1.0).abs() < 1e-12);
        // love occurs in one: idf = ln(3/2) + 1
        let love_idf = (1.5f64).ln() + 1.0;
        assert!((vectorizer.idf()[0] - love_idf).abs() < 1e-12);

        let norm = (love_idf * love_idf + 4.0).sqrt();
        let love = *matrix.get(0, 0).unwrap();
        let robot = *matrix.get(0, 1).unwrap();
        assert!((love - love_idf / norm).abs() < 1e-12);
        assert!((robot - 2.0 / norm).abs() < 1e-12);
    }

    #[test]
    fn test_max_doc_freq_excludes_common_terms() {
        let documents = vec![
            "robot love",
            "robot spy",
            "robot desert",
            "cowboy horse",
        ];
        let mut vectorizer = TfIdfVectorizer::new(0.5).unwrap();

        vectorizer.fit(&documents).unwrap();

        // robot appears in 3 of 4 documents (> 0.5 * 4)
        assert!(!vectorizer.vocabulary().contains(&"robot".to_string()));
        assert!(vectorizer.vocabulary().contains(&"cowboy".to_string()));
    }

    #[test]
    fn test_unknown_terms_are_dropped() {
        let mut vectorizer = TfIdfVectorizer::new(1.0).unwrap();
        vectorizer.fit(&["robot love", "spy mission"]).unwrap();

        let matrix = vectorizer.transform(&["dinosaur island", "robot dinosaur"]).unwrap();

        assert_eq!(matrix.outer_view(0).map(|row| row.nnz()), Some(0));
        assert_eq!(matrix.outer_view(1).map(|row| row.nnz()), Some(1));
    }

    #[test]
    fn test_empty_and_degenerate_corpus() {
        let mut vectorizer = TfIdfVectorizer::new(0.25).unwrap();
        let empty: Vec<String> = Vec::new();

        assert!(matches!(
            vectorizer.fit(&empty),
            Err(InaworldError::EmptyCorpus)
        ));
        assert!(matches!(
            vectorizer.fit(&["the and of", "1999 2001"]),
            Err(InaworldError::DegenerateVocabulary { .. })
        ));
        // every term is in 1 of 2 documents, above 0.25 * 2
        assert!(matches!(
            vectorizer.fit(&["robot", "spy"]),
            Err(InaworldError::DegenerateVocabulary { .. })
        ));
    }
}
