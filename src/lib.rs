//! A multinomial-event Naive Bayes text classifier for labeled posts.
//!
//! Posts are read from CSV files with `tag` and `content` columns, a
//! [`TrainedModel`] is estimated from the training posts, and test posts are
//! scored against every label to pick the most probable one.

pub mod bayes;
pub mod error;
pub mod record;
pub mod report;

pub use bayes::{Evaluation, NaiveBayesClassifier, Outcome, Prediction, TrainedModel};
pub use error::{ClassifierError, Result};
pub use record::{read_records, Record};
