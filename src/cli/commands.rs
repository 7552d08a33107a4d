//! Command implementations for the inaworld CLI.

use std::time::Instant;

use tracing::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SessionConfig;
use crate::corpus::CsvSource;
use crate::error::{InaworldError, Result};
use crate::session::ModelSession;

/// Execute a CLI command.
pub fn execute_command(args: InaworldArgs) -> Result<()> {
    match &args.command {
        Command::Genres(genres_args) => {
            let result = genre_counts(genres_args, &args)?;
            output_result("Genre counts", &result, &args)
        }
        Command::Report(training_args) => {
            let result = report(training_args, &args)?;
            output_result("Validation report", &result, &args)
        }
        Command::Predict(predict_args) => {
            let result = predict(predict_args, &args)?;
            output_result("Predicted genres", &result, &args)
        }
    }
}

/// Load the corpus and count movies per genre.
pub fn genre_counts(args: &GenresArgs, cli_args: &InaworldArgs) -> Result<GenreCountsResult> {
    let config = args.data.apply(base_config(cli_args)?);
    let mut session = open_session(config, &args.data)?;
    session.load()?;

    let examples = session.corpus().map_or(0, |corpus| corpus.len());
    Ok(GenreCountsResult {
        source: args.data.data.display().to_string(),
        examples,
        genres: session.genre_counts()?,
    })
}

/// Load, train and evaluate on the validation split.
pub fn report(args: &TrainingArgs, cli_args: &InaworldArgs) -> Result<ReportResult> {
    let session = trained_session(args, cli_args)?;
    let (train_examples, test_examples) = session
        .split()
        .map(|split| (split.train_indices.len(), split.test_indices.len()))
        .ok_or_else(|| InaworldError::untrained("report"))?;

    Ok(ReportResult {
        source: args.data.data.display().to_string(),
        train_examples,
        test_examples,
        report: session.classification_report()?,
    })
}

/// Load, train and predict genres for the given summaries.
pub fn predict(args: &PredictArgs, cli_args: &InaworldArgs) -> Result<PredictionResult> {
    let session = trained_session(&args.training, cli_args)?;
    let genres = session.predict_many(&args.summaries)?;

    Ok(PredictionResult {
        predictions: args
            .summaries
            .iter()
            .cloned()
            .zip(genres)
            .map(|(summary, genres)| Prediction { summary, genres })
            .collect(),
    })
}

/// Configuration from `--config` when given, defaults otherwise.
fn base_config(cli_args: &InaworldArgs) -> Result<SessionConfig> {
    match &cli_args.config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            SessionConfig::from_json_file(path)
        }
        None => Ok(SessionConfig::default()),
    }
}

fn open_session(config: SessionConfig, data: &DataArgs) -> Result<ModelSession> {
    ModelSession::new(config, Box::new(CsvSource::new(&data.data)))
}

fn trained_session(args: &TrainingArgs, cli_args: &InaworldArgs) -> Result<ModelSession> {
    let config = args.apply(base_config(cli_args)?);
    let mut session = open_session(config, &args.data)?;

    let start = Instant::now();
    session.load()?;
    session.train()?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "session trained"
    );

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_corpus() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,title,summary,genres").unwrap();
        let rows = [
            ("A spy chases a villain through exploding streets.", r#"["Action"]"#),
            ("Two strangers fall in love on a train.", r#"["Romance"]"#),
            ("Soldiers fight a desperate battle with guns.", r#"["Action"]"#),
            ("A widow finds love again in Paris.", r#"["Romance"]"#),
            ("Mercenaries blow up a bridge in a gunfight.", r#"["Action"]"#),
            ("Lovers marry after a long courtship.", r#"["Romance"]"#),
            ("A bomb threatens the city and a cop races to stop it.", r#"["Action"]"#),
            ("A shy baker falls for her customer.", r#"["Romance"]"#),
        ];
        for (i, (summary, genres)) in rows.iter().enumerate() {
            let genres = genres.replace('"', "\"\"");
            writeln!(file, "{i},Movie {i},\"{summary}\",\"{genres}\"").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn cli(argv: &[&str]) -> InaworldArgs {
        InaworldArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_genre_counts_command() {
        let file = write_corpus();
        let path = file.path().to_str().unwrap();
        let args = cli(&["inaworld", "genres", "--data", path]);

        let Command::Genres(genres_args) = &args.command else {
            panic!("Expected Genres command");
        };
        let result = genre_counts(genres_args, &args).unwrap();

        assert_eq!(result.examples, 8);
        assert_eq!(result.genres["action"], 4);
        assert_eq!(result.genres["romance"], 4);
    }

    #[test]
    fn test_report_and_predict_commands() {
        let file = write_corpus();
        let path = file.path().to_str().unwrap();

        let args = cli(&[
            "inaworld", "report", "-d", path, "--seed", "3", "--max-df", "1.0", "--jobs", "1",
        ]);
        let Command::Report(training_args) = &args.command else {
            panic!("Expected Report command");
        };
        let result = report(training_args, &args).unwrap();
        assert_eq!(result.train_examples, 6);
        assert_eq!(result.test_examples, 2);
        assert_eq!(result.report.labels.len(), 2);

        let args = cli(&[
            "inaworld", "predict", "-d", path, "--seed", "3", "--max-df", "1.0", "A new movie",
        ]);
        let Command::Predict(predict_args) = &args.command else {
            panic!("Expected Predict command");
        };
        let result = predict(predict_args, &args).unwrap();
        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.predictions[0].summary, "A new movie");
    }

    #[test]
    fn test_config_file_and_overrides() {
        let file = write_corpus();
        let path = file.path().to_str().unwrap();
        let mut config_file = NamedTempFile::new().unwrap();
        write!(config_file, r#"{{"min_genre_count": 5}}"#).unwrap();
        config_file.flush().unwrap();
        let config_path = config_file.path().to_str().unwrap();

        // every genre has 4 movies, so min count 5 leaves nothing
        let args = cli(&["inaworld", "--config", config_path, "genres", "-d", path]);
        let Command::Genres(genres_args) = &args.command else {
            panic!("Expected Genres command");
        };
        assert!(matches!(
            genre_counts(genres_args, &args),
            Err(InaworldError::DegenerateVocabulary { .. })
        ));

        let args = cli(&[
            "inaworld", "--config", config_path, "genres", "-d", path, "--min-genre-count", "4",
        ]);
        let Command::Genres(genres_args) = &args.command else {
            panic!("Expected Genres command");
        };
        assert_eq!(genre_counts(genres_args, &args).unwrap().genres.len(), 2);
    }

    #[test]
    fn test_missing_data_file() {
        let args = cli(&["inaworld", "genres", "-d", "/nonexistent/movies.csv"]);
        let Command::Genres(genres_args) = &args.command else {
            panic!("Expected Genres command");
        };

        assert!(genre_counts(genres_args, &args).is_err());
    }
}
