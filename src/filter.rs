//! Frequency filtering of genres and the movies that depend on them.
//!
//! Rare genres are dropped first; a movie is then kept only while at least
//! one of its genres survives. The two masks are computed together in a
//! single pass and [`KeepMasks::apply`] is the one place where they are
//! applied to the co-indexed arrays of a [`LabeledCorpus`].
//!
//! Removing movies can lower the count of a surviving genre below the
//! threshold. Counts are not re-verified after row filtering.
//!
//! ```
//! use inaworld::corpus::{LabeledCorpus, MovieRecord};
//! use inaworld::filter::KeepMasks;
//!
//! let corpus = LabeledCorpus::from_records(vec![
//!     MovieRecord::new("a", r#"["Drama"]"#),
//!     MovieRecord::new("b", r#"["Drama", "Noir"]"#),
//!     MovieRecord::new("c", r#"["Western"]"#),
//! ]).unwrap();
//!
//! let masks = KeepMasks::compute(&corpus.labels, 2).unwrap();
//! assert_eq!(masks.labels, vec![true, false, false]);
//! assert_eq!(masks.examples, vec![true, true, false]);
//!
//! let filtered = masks.apply(corpus).unwrap();
//! assert_eq!(filtered.genre_vocabulary, vec!["drama"]);
//! assert_eq!(filtered.summaries, vec!["a", "b"]);
//! ```

use sprs::CsMat;
use tracing::{debug, info};

use crate::corpus::LabeledCorpus;
use crate::error::{InaworldError, Result};
use crate::split::Rows;
use crate::vectorize::sparse::{column_counts, select_columns};

/// Number of examples carrying each genre (column sums of the indicator matrix).
pub fn genre_counts(labels: &CsMat<u8>) -> Vec<usize> {
    column_counts(labels)
}

/// Label and example keep-masks derived from one indicator matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepMasks {
    /// One entry per genre column: the genre has at least `min_count` examples.
    pub labels: Vec<bool>,
    /// One entry per example: it keeps at least one surviving genre.
    pub examples: Vec<bool>,
}

impl KeepMasks {
    /// Compute both masks for the given threshold.
    pub fn compute(labels: &CsMat<u8>, min_count: usize) -> Result<Self> {
        if min_count < 1 {
            return Err(InaworldError::invalid_config(
                "minimum genre count must be at least 1",
            ));
        }

        let label_mask: Vec<bool> = genre_counts(labels)
            .into_iter()
            .map(|count| count >= min_count)
            .collect();

        let restricted = select_columns(labels, &label_mask)?;
        let example_mask: Vec<bool> = restricted
            .outer_iterator()
            .map(|row| row.iter().any(|(_, &value)| value > 0))
            .collect();

        Ok(KeepMasks {
            labels: label_mask,
            examples: example_mask,
        })
    }

    /// Number of genres kept.
    pub fn kept_labels(&self) -> usize {
        self.labels.iter().filter(|&&kept| kept).count()
    }

    /// Number of examples kept.
    pub fn kept_examples(&self) -> usize {
        self.examples.iter().filter(|&&kept| kept).count()
    }

    /// Apply the masks to every co-indexed array of the corpus: genre columns
    /// first, then example rows.
    pub fn apply(&self, corpus: LabeledCorpus) -> Result<LabeledCorpus> {
        if self.labels.len() != corpus.genre_vocabulary.len() {
            return Err(InaworldError::shape_mismatch(
                corpus.genre_vocabulary.len(),
                self.labels.len(),
            ));
        }

        let LabeledCorpus {
            genres,
            summaries,
            genre_vocabulary,
            labels,
        } = corpus;

        let dropped: Vec<String> = genre_vocabulary
            .iter()
            .zip(&self.labels)
            .filter(|(_, kept)| !**kept)
            .map(|(genre, _)| genre.clone())
            .collect();
        debug!(?dropped, "dropped rare genres");

        let genre_vocabulary: Vec<String> = genre_vocabulary
            .into_iter()
            .zip(&self.labels)
            .filter_map(|(genre, &kept)| kept.then_some(genre))
            .collect();
        let labels = select_columns(&labels, &self.labels)?;

        let filtered = LabeledCorpus {
            genres: self.select_examples(&genres)?,
            summaries: self.select_examples(&summaries)?,
            genre_vocabulary,
            labels: self.select_examples(&labels)?,
        };

        info!(
            genres_kept = filtered.genre_vocabulary.len(),
            genres_dropped = dropped.len(),
            examples_kept = filtered.len(),
            examples_dropped = self.examples.len() - filtered.len(),
            "applied frequency filter"
        );

        Ok(filtered)
    }

    /// Apply the example mask to any other array aligned with the corpus rows,
    /// such as a TF-IDF matrix computed before filtering.
    pub fn select_examples<R: Rows>(&self, rows: &R) -> Result<R> {
        rows.select_rows(&self.examples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    fn indicator(rows: usize, cols: usize, ones: &[(usize, usize)]) -> CsMat<u8> {
        let mut tri = TriMat::new((rows, cols));
        for &(row, col) in ones {
            tri.add_triplet(row, col, 1u8);
        }
        tri.to_csr()
    }

    #[test]
    fn test_genre_counts() {
        let labels = indicator(3, 3, &[(0, 0), (1, 0), (1, 2), (2, 2)]);

        assert_eq!(genre_counts(&labels), vec![2, 0, 2]);
    }

    #[test]
    fn test_keep_masks() {
        // genre 1 is a singleton; example 2 only has genre 1
        let labels = indicator(4, 3, &[(0, 0), (1, 0), (2, 1), (3, 2), (0, 2)]);

        let masks = KeepMasks::compute(&labels, 2).unwrap();

        assert_eq!(masks.labels, vec![true, false, true]);
        assert_eq!(masks.examples, vec![true, true, false, true]);
        assert_eq!(masks.kept_labels(), 2);
        assert_eq!(masks.kept_examples(), 3);
    }

    #[test]
    fn test_threshold_one_keeps_everything_labeled() {
        let labels = indicator(3, 2, &[(0, 0), (1, 1)]);

        let masks = KeepMasks::compute(&labels, 1).unwrap();

        assert_eq!(masks.labels, vec![true, true]);
        // a row with no labels at all never survives
        assert_eq!(masks.examples, vec![true, true, false]);
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let labels = indicator(1, 1, &[(0, 0)]);

        assert!(KeepMasks::compute(&labels, 0).is_err());
    }

    #[test]
    fn test_apply_keeps_arrays_aligned() {
        let corpus = LabeledCorpus::from_records(vec![
            crate::corpus::MovieRecord::new("one", r#"["Drama", "Comedy"]"#),
            crate::corpus::MovieRecord::new("two", r#"["Western"]"#),
            crate::corpus::MovieRecord::new("three", r#"["Drama"]"#),
            crate::corpus::MovieRecord::new("four", r#"["Comedy"]"#),
        ])
        .unwrap();
        let masks = KeepMasks::compute(&corpus.labels, 2).unwrap();

        let filtered = masks.apply(corpus).unwrap();

        assert_eq!(filtered.genre_vocabulary, vec!["comedy", "drama"]);
        assert_eq!(filtered.summaries, vec!["one", "three", "four"]);
        assert_eq!(filtered.genres[1], r#"["Drama"]"#);
        assert_eq!(filtered.labels.shape(), (3, 2));
        assert_eq!(filtered.example_genres(0), vec!["comedy", "drama"]);
        assert_eq!(filtered.example_genres(2), vec!["comedy"]);
    }

    #[test]
    fn test_apply_rejects_foreign_masks() {
        let corpus =
            LabeledCorpus::from_records(vec![crate::corpus::MovieRecord::new("one", r#"["Drama"]"#)])
                .unwrap();
        let masks = KeepMasks {
            labels: vec![true, true],
            examples: vec![true],
        };

        assert!(matches!(
            masks.apply(corpus),
            Err(InaworldError::ShapeMismatch { .. })
        ));
    }
}
