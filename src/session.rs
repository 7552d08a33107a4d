//! Stateful model session: load, train, then predict and report.
//!
//! ```text
//!   Unloaded --load()--> Loaded --train()--> Trained
//!      ^                   ^  |                 |
//!      |                   |  +-----load()------+   (reload discards the model)
//!      +---------- new() --+                        (train() again retrains)
//! ```
//!
//! Each operation checks its prerequisite and fails with
//! [`InaworldError::Unloaded`] or [`InaworldError::Untrained`] so callers can
//! branch on the cause.
//!
//! ```
//! use inaworld::config::SessionConfig;
//! use inaworld::corpus::{InMemorySource, MovieRecord};
//! use inaworld::error::InaworldError;
//! use inaworld::session::{ModelSession, SessionState};
//!
//! let source = InMemorySource::new(vec![
//!     MovieRecord::new("A spy saves the world", r#"["Action", "Thriller"]"#),
//!     MovieRecord::new("A robot falls in love", r#"["Romance"]"#),
//! ]);
//! let config = SessionConfig::default().with_min_genre_count(1);
//! let mut session = ModelSession::new(config, Box::new(source)).unwrap();
//!
//! assert!(matches!(session.train(), Err(InaworldError::Unloaded { .. })));
//!
//! session.load().unwrap();
//! assert_eq!(session.state(), SessionState::Loaded);
//! assert_eq!(session.genre_counts().unwrap()["romance"], 1);
//! assert!(matches!(session.predict("a spy"), Err(InaworldError::Untrained { .. })));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use sprs::CsMat;
use tracing::info;

use crate::config::SessionConfig;
use crate::corpus::{CorpusSource, CsvSource, LabeledCorpus, prefilter_records};
use crate::error::{InaworldError, Result};
use crate::evaluation::ClassificationReport;
use crate::filter::{KeepMasks, genre_counts};
use crate::pipeline::TextClassificationPipeline;
use crate::split::{SplitConfig, SplitPayload, split_data};
use crate::vectorize::{Vectorized, vectorize_summaries};

/// Lifecycle stage of a [`ModelSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loaded,
    Trained,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unloaded => "unloaded",
            SessionState::Loaded => "loaded",
            SessionState::Trained => "trained",
        };
        f.write_str(name)
    }
}

/// A fitted pipeline together with the split it was trained on.
#[derive(Debug)]
struct TrainedModel {
    pipeline: TextClassificationPipeline,
    split: SplitPayload<Vec<String>, CsMat<u8>>,
}

/// Owns one corpus and at most one trained model.
pub struct ModelSession {
    config: SessionConfig,
    source: Box<dyn CorpusSource>,
    corpus: Option<LabeledCorpus>,
    model: Option<TrainedModel>,
}

impl fmt::Debug for ModelSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSession")
            .field("source", &self.source.describe())
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

impl ModelSession {
    /// Create an unloaded session. The configuration is validated here.
    pub fn new(config: SessionConfig, source: Box<dyn CorpusSource>) -> Result<Self> {
        config.validate()?;
        Ok(ModelSession {
            config,
            source,
            corpus: None,
            model: None,
        })
    }

    /// Create an unloaded session reading a CSV file.
    pub fn from_csv<P: AsRef<Path>>(config: SessionConfig, path: P) -> Result<Self> {
        Self::new(config, Box::new(CsvSource::new(path)))
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> SessionState {
        match (&self.corpus, &self.model) {
            (None, _) => SessionState::Unloaded,
            (Some(_), None) => SessionState::Loaded,
            (Some(_), Some(_)) => SessionState::Trained,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Fetch, pre-filter, encode and frequency-filter the corpus.
    ///
    /// Reloading discards any trained model.
    pub fn load(&mut self) -> Result<()> {
        self.model = None;
        self.corpus = None;

        let records = self.source.fetch()?;
        info!(source = %self.source.describe(), records = records.len(), "fetched records");

        let records = prefilter_records(records);
        if records.is_empty() {
            return Err(InaworldError::EmptyCorpus);
        }

        let corpus = LabeledCorpus::from_records(records)?;
        let masks = KeepMasks::compute(&corpus.labels, self.config.min_genre_count)?;
        if masks.kept_labels() == 0 {
            return Err(InaworldError::degenerate_vocabulary(format!(
                "no genre occurs in at least {} movies",
                self.config.min_genre_count
            )));
        }

        let corpus = masks.apply(corpus)?;
        info!(corpus = %corpus, "loaded corpus");

        self.corpus = Some(corpus);
        Ok(())
    }

    /// Split the loaded corpus and fit a pipeline on the training part.
    /// Training again replaces the previous model.
    pub fn train(&mut self) -> Result<()> {
        let corpus = self
            .corpus
            .as_ref()
            .ok_or_else(|| InaworldError::unloaded("train"))?;

        let split = split_data(
            &corpus.summaries,
            &corpus.labels,
            &SplitConfig::from(&self.config),
        )?;

        let mut pipeline = TextClassificationPipeline::from_config(&self.config)?;
        pipeline.fit(&split.x_train, &split.y_train)?;

        self.model = Some(TrainedModel { pipeline, split });
        Ok(())
    }

    /// Genre names predicted for one summary, in vocabulary order.
    pub fn predict(&self, summary: &str) -> Result<Vec<String>> {
        Ok(self
            .predict_many(&[summary])?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// Genre names predicted for every summary.
    pub fn predict_many<S: AsRef<str>>(&self, summaries: &[S]) -> Result<Vec<Vec<String>>> {
        let (model, corpus) = self.trained("predict")?;
        let predictions = model.pipeline.predict(summaries)?;

        Ok(predictions
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .zip(&corpus.genre_vocabulary)
                    .filter(|&(&value, _)| value > 0)
                    .map(|(_, genre)| genre.clone())
                    .collect()
            })
            .collect())
    }

    /// Evaluate the model on the validation part of its split.
    pub fn classification_report(&self) -> Result<ClassificationReport> {
        let (model, corpus) = self.trained("classification_report")?;
        let y_pred = model.pipeline.predict(&model.split.x_test)?;
        let y_true = model.split.y_test.to_dense();
        ClassificationReport::compute(&y_true, &y_pred, &corpus.genre_vocabulary)
    }

    /// The validation report rendered as a text table.
    pub fn report(&self) -> Result<String> {
        self.trained("report")?;
        Ok(self.classification_report()?.to_string())
    }

    /// Number of movies per genre after filtering.
    pub fn genre_counts(&self) -> Result<BTreeMap<String, usize>> {
        let corpus = self.loaded("genre_counts")?;
        Ok(corpus
            .genre_vocabulary
            .iter()
            .cloned()
            .zip(genre_counts(&corpus.labels))
            .collect())
    }

    /// The filtered, sorted genre vocabulary.
    pub fn genre_vocabulary(&self) -> Result<&[String]> {
        Ok(&self.loaded("genre_vocabulary")?.genre_vocabulary)
    }

    /// TF-IDF rows for the loaded summaries, aligned with the corpus rows.
    pub fn summary_vectors(&self) -> Result<Vectorized<f64>> {
        let corpus = self.loaded("summary_vectors")?;
        vectorize_summaries(&corpus.summaries, self.config.max_doc_freq)
    }

    /// The loaded corpus, if any.
    pub fn corpus(&self) -> Option<&LabeledCorpus> {
        self.corpus.as_ref()
    }

    /// The split used by the current model, if any.
    pub fn split(&self) -> Option<&SplitPayload<Vec<String>, CsMat<u8>>> {
        self.model.as_ref().map(|model| &model.split)
    }

    /// The current fitted pipeline, if any.
    pub fn pipeline(&self) -> Option<&TextClassificationPipeline> {
        self.model.as_ref().map(|model| &model.pipeline)
    }

    fn loaded(&self, operation: &str) -> Result<&LabeledCorpus> {
        self.corpus
            .as_ref()
            .ok_or_else(|| InaworldError::unloaded(operation))
    }

    fn trained(&self, operation: &str) -> Result<(&TrainedModel, &LabeledCorpus)> {
        match (&self.model, &self.corpus) {
            (Some(model), Some(corpus)) => Ok((model, corpus)),
            _ => Err(InaworldError::untrained(operation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{InMemorySource, MovieRecord};

    fn session(records: Vec<MovieRecord>, config: SessionConfig) -> ModelSession {
        ModelSession::new(config, Box::new(InMemorySource::new(records))).unwrap()
    }

    fn genre_corpus() -> Vec<MovieRecord> {
        let action = [
            "explosions", "gunfight", "chase", "soldier", "battle", "mercenary", "bomb", "weapons",
        ];
        let romance = [
            "love", "kiss", "wedding", "heart", "passion", "lovers", "romance", "sweetheart",
        ];
        let mut records = Vec::new();
        for i in 0..24 {
            let (words, genre) = if i % 2 == 0 {
                (&action, r#"["Action"]"#)
            } else {
                (&romance, r#"["Romance"]"#)
            };
            let summary = format!(
                "{} {} {}",
                words[i % 8],
                words[(i + 3) % 8],
                words[(i + 5) % 8]
            );
            records.push(MovieRecord::new(summary, genre));
        }
        records
    }

    #[test]
    fn test_initial_state_and_preconditions() {
        let session = session(genre_corpus(), SessionConfig::default());

        assert_eq!(session.state(), SessionState::Unloaded);
        assert!(matches!(
            session.genre_counts(),
            Err(InaworldError::Unloaded { .. })
        ));
        assert!(matches!(
            session.summary_vectors(),
            Err(InaworldError::Unloaded { .. })
        ));
        assert!(matches!(
            session.predict("love"),
            Err(InaworldError::Untrained { .. })
        ));
        assert!(matches!(session.report(), Err(InaworldError::Untrained { .. })));
    }

    #[test]
    fn test_train_predict_report() {
        let config = SessionConfig::default()
            .with_seed(11)
            .with_n_jobs(2)
            .with_max_doc_freq(1.0);
        let mut session = session(genre_corpus(), config);

        session.load().unwrap();
        session.train().unwrap();

        assert_eq!(session.state(), SessionState::Trained);
        assert_eq!(session.split().unwrap().x_test.len(), 6);
        assert_eq!(session.predict("passion and love").unwrap(), vec!["romance"]);
        assert_eq!(
            session.predict_many(&["a bomb chase", "kiss"]).unwrap(),
            vec![vec!["action".to_string()], vec!["romance".to_string()]]
        );

        let report = session.report().unwrap();
        assert!(report.contains("action"));
        assert!(report.contains("samples avg"));
        assert_eq!(session.classification_report().unwrap().labels.len(), 2);
    }

    #[test]
    fn test_reload_discards_model() {
        let config = SessionConfig::default().with_seed(5);
        let mut session = session(genre_corpus(), config);
        session.load().unwrap();
        session.train().unwrap();

        session.load().unwrap();

        assert_eq!(session.state(), SessionState::Loaded);
        assert!(session.pipeline().is_none());
    }

    #[test]
    fn test_summary_vectors_align_with_corpus() {
        let mut session = session(genre_corpus(), SessionConfig::default());
        session.load().unwrap();

        let vectors = session.summary_vectors().unwrap();

        assert_eq!(vectors.matrix.rows(), session.corpus().unwrap().len());
        assert_eq!(vectors.matrix.cols(), vectors.vocabulary.len());
    }

    #[test]
    fn test_load_fails_without_usable_records() {
        let mut session = session(
            vec![MovieRecord::new("", r#"["Drama"]"#)],
            SessionConfig::default(),
        );

        assert!(matches!(session.load(), Err(InaworldError::EmptyCorpus)));
        assert_eq!(session.state(), SessionState::Unloaded);
    }

    #[test]
    fn test_load_fails_when_every_genre_is_rare() {
        let mut session = session(
            vec![
                MovieRecord::new("one", r#"["Drama"]"#),
                MovieRecord::new("two", r#"["Comedy"]"#),
            ],
            SessionConfig::default(),
        );

        assert!(matches!(
            session.load(),
            Err(InaworldError::DegenerateVocabulary { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = ModelSession::new(
            SessionConfig::default().with_test_size(1.5),
            Box::new(InMemorySource::default()),
        );

        assert!(matches!(result, Err(InaworldError::InvalidConfig(_))));
    }
}
