//! Error types for the classifier and its record source.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Training was asked to run on zero records; the class priors would be `ln(0/0)`.
    #[error("cannot train on an empty training set")]
    EmptyTrainingSet,

    /// A prediction was requested before any successful training call.
    #[error("classifier has not been trained")]
    NotTrained,

    /// The input source is readable but does not have the expected shape.
    #[error("malformed input in {source_name}: {message}")]
    MalformedInput {
        source_name: String,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ClassifierError {
    pub fn malformed<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        ClassifierError::MalformedInput {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
