use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use piazza_bayes::{read_records, report, NaiveBayesClassifier};
use tracing_subscriber::EnvFilter;

/// Trains a Naive Bayes classifier on labeled posts and reports how well it
/// predicts a second set of posts.
#[derive(Parser, Debug)]
#[command(name = "piazza_bayes", version, long_about = None)]
struct Args {
    /// CSV file with `tag` and `content` columns to train on
    #[arg(value_name = "TRAIN_FILE")]
    train_file: PathBuf,

    /// CSV file with `tag` and `content` columns to test against
    #[arg(value_name = "TEST_FILE")]
    test_file: PathBuf,

    /// Print the training data and every model parameter
    #[arg(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging();

    let stdout = io::stdout();
    if let Err(e) = run(&args, &mut stdout.lock()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// `--debug` only affects the report; log verbosity comes from RUST_LOG.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let train_data = read_records(&args.train_file).with_context(|| {
        format!("failed to read training data from {}", args.train_file.display())
    })?;
    let test_data = read_records(&args.test_file).with_context(|| {
        format!("failed to read test data from {}", args.test_file.display())
    })?;

    let mut classifier = NaiveBayesClassifier::new();
    let model = classifier.train(&train_data).context("training failed")?;

    report::write_training(out, &train_data, model, args.debug)?;

    let evaluation = classifier.evaluate(&test_data)?;
    report::write_evaluation(out, &test_data, &evaluation)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const TRAIN_CSV: &str = "tag,content\nsports,great game\npolitics,the vote\n";
    const TEST_CSV: &str = "tag,content\nsports,great\n";

    fn args(train: &Path, test: &Path, debug: bool) -> Args {
        Args {
            train_file: train.to_path_buf(),
            test_file: test.to_path_buf(),
            debug,
        }
    }

    fn fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn run_to_string(args: &Args) -> Result<String> {
        let mut out = Vec::new();
        run(args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parses_files_and_debug_flag() {
        let args =
            Args::try_parse_from(["piazza_bayes", "train.csv", "test.csv", "--debug"]).unwrap();

        assert_eq!(args.train_file, PathBuf::from("train.csv"));
        assert_eq!(args.test_file, PathBuf::from("test.csv"));
        assert!(args.debug);

        let args = Args::try_parse_from(["piazza_bayes", "train.csv", "test.csv"]).unwrap();
        assert!(!args.debug);
    }

    #[test]
    fn rejects_missing_test_file() {
        let err = Args::try_parse_from(["piazza_bayes", "train.csv"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = Args::try_parse_from(["piazza_bayes", "train.csv", "test.csv", "--verbose"])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn header_only_training_file_fails_training() {
        let dir = TempDir::new().unwrap();
        let train = fixture(&dir, "train.csv", "tag,content\n");
        let test = fixture(&dir, "test.csv", TEST_CSV);

        let err = run_to_string(&args(&train, &test, false)).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "training failed: cannot train on an empty training set"
        );
    }

    #[test]
    fn missing_training_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let train = dir.path().join("nope.csv");
        let test = fixture(&dir, "test.csv", TEST_CSV);

        let err = run_to_string(&args(&train, &test, false)).unwrap_err();
        let rendered = format!("{err:#}");

        let prefix = format!("failed to read training data from {}: ", train.display());
        assert!(rendered.starts_with(&prefix), "{rendered}");
        assert_eq!(rendered.matches("os error").count(), 1, "{rendered}");
    }

    #[test]
    fn malformed_test_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let train = fixture(&dir, "train.csv", TRAIN_CSV);
        let test = fixture(&dir, "test.csv", "tag,body\nsports,great\n");

        let err = run_to_string(&args(&train, &test, false)).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            format!(
                "failed to read test data from {0}: malformed input in {0}: {1}",
                test.display(),
                "missing required column `content`"
            )
        );
    }

    #[test]
    fn debug_flag_switches_on_the_model_listing() {
        let dir = TempDir::new().unwrap();
        let train = fixture(&dir, "train.csv", TRAIN_CSV);
        let test = fixture(&dir, "test.csv", TEST_CSV);

        let quiet = run_to_string(&args(&train, &test, false)).unwrap();
        assert!(quiet.starts_with("trained on 2 examples\n\ntest data:\n"));
        assert!(!quiet.contains("classifier parameters:"));

        let verbose = run_to_string(&args(&train, &test, true)).unwrap();
        assert!(verbose.starts_with("training data:\n"));
        assert!(verbose.contains("vocabulary size = 4\n"));
        assert!(verbose.contains("classifier parameters:\n"));
        assert!(verbose.ends_with("performance: 1 / 1 posts predicted correctly\n"));
    }
}
