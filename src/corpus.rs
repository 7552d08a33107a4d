//! Movie records and the sources they are fetched from.
//!
//! A record only needs a plot summary and a raw genre field; any other
//! column in the input (id, title, release date, runtime, revenue) is
//! ignored during decoding.

use std::fmt;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use tracing::{info, warn};

use crate::error::{InaworldError, Result};
use crate::vectorize::{Vectorized, vectorize_genres};

/// One movie: a free-text summary and a raw genre field such as
/// `["Action", "Space western"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Plot summary.
    #[serde(default)]
    pub summary: String,

    /// Bracketed, comma-separated list of quoted genre phrases.
    #[serde(default)]
    pub genres: String,
}

impl MovieRecord {
    /// Create a new record.
    pub fn new<S: Into<String>, G: Into<String>>(summary: S, genres: G) -> Self {
        MovieRecord {
            summary: summary.into(),
            genres: genres.into(),
        }
    }

    /// A record survives pre-filtering when its genre field is longer than
    /// two characters (more than `[]`) and its summary is not empty.
    pub fn is_usable(&self) -> bool {
        self.genres.chars().count() > 2 && !self.summary.is_empty()
    }
}

/// Something that can produce the raw movie records of a corpus.
pub trait CorpusSource: Send + Sync {
    /// Fetch every record, in source order.
    fn fetch(&self) -> Result<Vec<MovieRecord>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Reads records from a headered CSV file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Create a source reading the given CSV file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for CsvSource {
    fn fetch(&self) -> Result<Vec<MovieRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        for column in ["summary", "genres"] {
            if !headers.iter().any(|header| header == column) {
                return Err(InaworldError::invalid_config(format!(
                    "{} has no '{column}' column",
                    self.path.display()
                )));
            }
        }

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: MovieRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Serves records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<MovieRecord>,
}

impl InMemorySource {
    /// Create a source over the given records.
    pub fn new(records: Vec<MovieRecord>) -> Self {
        InMemorySource { records }
    }
}

impl From<Vec<MovieRecord>> for InMemorySource {
    fn from(records: Vec<MovieRecord>) -> Self {
        Self::new(records)
    }
}

impl CorpusSource for InMemorySource {
    fn fetch(&self) -> Result<Vec<MovieRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} records", self.records.len())
    }
}

/// Drop records with an empty summary or a trivial genre field.
pub fn prefilter_records(records: Vec<MovieRecord>) -> Vec<MovieRecord> {
    let total = records.len();
    let kept: Vec<MovieRecord> = records.into_iter().filter(MovieRecord::is_usable).collect();
    if kept.len() < total {
        info!(
            total,
            dropped = total - kept.len(),
            "dropped records with empty summaries or genres"
        );
    }
    kept
}

/// Co-indexed arrays describing a corpus: row `i` of every field is movie `i`.
#[derive(Debug, Clone)]
pub struct LabeledCorpus {
    /// Raw genre fields.
    pub genres: Vec<String>,
    /// Raw summaries.
    pub summaries: Vec<String>,
    /// Sorted genre vocabulary; column `j` of `labels` is `genre_vocabulary[j]`.
    pub genre_vocabulary: Vec<String>,
    /// Examples x genres indicator matrix.
    pub labels: CsMat<u8>,
}

impl LabeledCorpus {
    /// Parse and encode the genre field of every record.
    pub fn from_records(records: Vec<MovieRecord>) -> Result<Self> {
        let (summaries, genres): (Vec<String>, Vec<String>) = records
            .into_iter()
            .map(|record| (record.summary, record.genres))
            .unzip();

        let Vectorized { vocabulary, matrix } = vectorize_genres(&genres)?;

        let unlabeled = matrix
            .outer_iterator()
            .filter(|row| row.nnz() == 0)
            .count();
        if unlabeled > 0 {
            warn!(unlabeled, "genre fields parsed to no labels");
        }

        Ok(LabeledCorpus {
            genres,
            summaries,
            genre_vocabulary: vocabulary,
            labels: matrix,
        })
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether the corpus has no examples.
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Genre names of one example, in vocabulary order.
    pub fn example_genres(&self, row: usize) -> Vec<String> {
        self.labels
            .outer_view(row)
            .map(|view| {
                view.iter()
                    .map(|(col, _)| self.genre_vocabulary[col].clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for LabeledCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} examples, {} genres",
            self.len(),
            self.genre_vocabulary.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_prefilter_records() {
        let records = vec![
            MovieRecord::new("A spy saves the world", r#"["Action", "Thriller"]"#),
            MovieRecord::new("A robot falls in love", r#"["Romance"]"#),
            MovieRecord::new("", r#"["Drama"]"#),
            MovieRecord::new("No genres at all", "[]"),
        ];

        let kept = prefilter_records(records);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].summary, "A robot falls in love");
    }

    #[test]
    fn test_labeled_corpus_from_records() {
        let records = vec![
            MovieRecord::new("A spy saves the world", r#"["Action", "Thriller"]"#),
            MovieRecord::new("A robot falls in love", r#"["Romance"]"#),
        ];

        let corpus = LabeledCorpus::from_records(records).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.genre_vocabulary, vec!["action", "romance", "thriller"]);
        assert_eq!(corpus.example_genres(0), vec!["action", "thriller"]);
        assert_eq!(corpus.example_genres(1), vec!["romance"]);
        assert_eq!(corpus.to_string(), "2 examples, 3 genres");
    }

    #[test]
    fn test_csv_source_ignores_extra_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,title,release_date,runtime,box_office_revenue,genres,summary").unwrap();
        writeln!(
            file,
            r#"1,Spy,1964-01-01,110,1000000,"[""Action"", ""Thriller""]","A spy saves the world, again.""#
        )
        .unwrap();
        writeln!(file, r#"2,Robot,,,,"[""Romance""]",A robot falls in love"#).unwrap();

        let source = CsvSource::new(file.path());
        let records = source.fetch().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].genres, r#"["Action", "Thriller"]"#);
        assert_eq!(records[0].summary, "A spy saves the world, again.");
        assert_eq!(records[1].summary, "A robot falls in love");
        assert!(source.describe().starts_with("csv:"));
    }

    #[test]
    fn test_csv_source_requires_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,title").unwrap();
        writeln!(file, "1,Spy").unwrap();

        assert!(matches!(
            CsvSource::new(file.path()).fetch(),
            Err(InaworldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::from(vec![MovieRecord::new("x", "[\"A\"]")]);

        assert_eq!(source.fetch().unwrap().len(), 1);
        assert_eq!(source.describe(), "memory:1 records");
    }
}
