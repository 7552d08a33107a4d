//! Bag-of-tokens encoders for genres and summaries.
//!
//! Both encoders return a sorted vocabulary together with a CSR matrix whose
//! rows follow the input order and whose columns follow the vocabulary.

pub mod label;
pub mod sparse;
pub mod tfidf;

pub use label::LabelVectorizer;
pub use tfidf::TfIdfVectorizer;

use sprs::CsMat;

use crate::error::Result;

/// A vocabulary and the matrix encoded against it.
#[derive(Debug, Clone)]
pub struct Vectorized<N> {
    /// Column labels in column order.
    pub vocabulary: Vec<String>,
    /// Examples x vocabulary.
    pub matrix: CsMat<N>,
}

/// Encode raw genre fields as a binary indicator matrix.
pub fn vectorize_genres<S: AsRef<str>>(genres: &[S]) -> Result<Vectorized<u8>> {
    let mut vectorizer = LabelVectorizer::new();
    let matrix = vectorizer.fit_transform(genres)?;
    Ok(Vectorized {
        vocabulary: vectorizer.vocabulary().to_vec(),
        matrix,
    })
}

/// Encode summaries as TF-IDF rows with the given document-frequency ceiling.
pub fn vectorize_summaries<S: AsRef<str>>(
    summaries: &[S],
    max_doc_freq: f64,
) -> Result<Vectorized<f64>> {
    let mut vectorizer = TfIdfVectorizer::new(max_doc_freq)?;
    let matrix = vectorizer.fit_transform(summaries)?;
    Ok(Vectorized {
        vocabulary: vectorizer.vocabulary().to_vec(),
        matrix,
    })
}
