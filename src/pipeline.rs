//! Text vectorizer and multi-label classifier as a single fit/predict unit.

use ndarray::Array2;
use sprs::CsMat;
use tracing::info;

use crate::classifier::OneVsRestClassifier;
use crate::config::SessionConfig;
use crate::error::{InaworldError, Result};
use crate::vectorize::TfIdfVectorizer;

/// Summaries in, genre indicator rows out.
///
/// `fit` learns the term vocabulary from the training summaries only and
/// freezes it; summaries seen later are encoded against that vocabulary and
/// unknown terms are dropped without error.
#[derive(Debug)]
pub struct TextClassificationPipeline {
    vectorizer: TfIdfVectorizer,
    classifier: OneVsRestClassifier,
}

impl TextClassificationPipeline {
    /// Assemble a pipeline from its two stages.
    pub fn new(vectorizer: TfIdfVectorizer, classifier: OneVsRestClassifier) -> Self {
        TextClassificationPipeline {
            vectorizer,
            classifier,
        }
    }

    /// Assemble the pipeline described by a session configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Ok(Self::new(
            TfIdfVectorizer::new(config.max_doc_freq)?,
            OneVsRestClassifier::new(config.classifier.clone(), config.effective_jobs())?,
        ))
    }

    /// Fit the vectorizer on `summaries`, then one classifier per column of `labels`.
    pub fn fit<S: AsRef<str>>(&mut self, summaries: &[S], labels: &CsMat<u8>) -> Result<()> {
        if summaries.len() != labels.rows() {
            return Err(InaworldError::shape_mismatch(labels.rows(), summaries.len()));
        }

        let features = self.vectorizer.fit_transform(summaries)?;
        info!(
            n_examples = summaries.len(),
            n_terms = self.vectorizer.vocabulary_size(),
            "vectorized training summaries"
        );

        self.classifier.fit(&features, labels)
    }

    /// Predict an indicator row (examples x labels) for every summary.
    pub fn predict<S: AsRef<str>>(&self, summaries: &[S]) -> Result<Array2<u8>> {
        if !self.is_fitted() {
            return Err(InaworldError::untrained("predict"));
        }
        let features = self.vectorizer.transform(summaries)?;
        self.classifier.predict(&features)
    }

    /// Decision scores (examples x labels) for every summary.
    pub fn decision_function<S: AsRef<str>>(&self, summaries: &[S]) -> Result<Array2<f64>> {
        if !self.is_fitted() {
            return Err(InaworldError::untrained("decision_function"));
        }
        let features = self.vectorizer.transform(summaries)?;
        self.classifier.decision_function(&features)
    }

    /// Whether both stages are fitted.
    pub fn is_fitted(&self) -> bool {
        self.vectorizer.is_fitted() && self.classifier.is_fitted()
    }

    /// The text vectorizer stage.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The classifier stage.
    pub fn classifier(&self) -> &OneVsRestClassifier {
        &self.classifier
    }
}
