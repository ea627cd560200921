use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{info, trace};

use crate::{
    error::{ClassifierError, Result},
    record::Record,
};

/// Distinct whitespace-separated words of `text`, case and punctuation kept as is.
pub fn unique_words(text: &str) -> BTreeSet<&str> {
    text.split(|c: char| c.is_ascii_whitespace() || c == '\u{0B}')
        .filter(|word| !word.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct LabelStats {
    num_posts: usize,
    log_prior: f64,
    // Posts with this label containing each word; only nonzero counts are kept.
    word_counts: BTreeMap<String, usize>,
    // One entry for every word of the vocabulary.
    log_likelihoods: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    num_posts: usize,
    // Posts containing each word. The keys are the vocabulary.
    word_counts: BTreeMap<String, usize>,
    // Iteration order of this map is the tie-break order used by `predict`.
    labels: BTreeMap<String, LabelStats>,
}

impl TrainedModel {
    /// Unseen (label, word) pairs back off to the word's document frequency
    /// over the whole training set.
    pub fn fit(records: &[Record]) -> Result<Self> {
        if records.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        let num_posts = records.len();

        // Count posts per label and (label, word) occurrences per post:

        let mut label_posts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut label_words: HashMap<(&str, &str), usize> = HashMap::new();
        for record in records {
            trace!(label = %record.label, content = %record.text, "training record");

            let label = record.label.as_str();
            *label_posts.entry(label).or_insert(0) += 1;
            for word in unique_words(&record.text) {
                *label_words.entry((label, word)).or_insert(0) += 1;
            }
        }

        // Collect the vocabulary along with the document frequency of each word:

        let mut word_counts: BTreeMap<String, usize> = BTreeMap::new();
        for (&(_, word), &count) in &label_words {
            *word_counts.entry(word.to_string()).or_insert(0) += count;
        }

        // Calculate the prior and the likelihoods of every label:

        let total = num_posts as f64;
        let mut labels = BTreeMap::new();
        for (&label, &label_count) in &label_posts {
            let posts = label_count as f64;

            let mut counts = BTreeMap::new();
            let mut log_likelihoods = HashMap::with_capacity(word_counts.len());
            for (word, &word_count) in &word_counts {
                let count = label_words
                    .get(&(label, word.as_str()))
                    .copied()
                    .unwrap_or(0);

                let log_likelihood = if count != 0 {
                    counts.insert(word.clone(), count);
                    (count as f64 / posts).ln()
                } else {
                    (word_count as f64 / total).ln()
                };
                log_likelihoods.insert(word.clone(), log_likelihood);
            }

            labels.insert(
                label.to_string(),
                LabelStats {
                    num_posts: label_count,
                    log_prior: (posts / total).ln(),
                    word_counts: counts,
                    log_likelihoods,
                },
            );
        }

        info!(
            posts = num_posts,
            labels = labels.len(),
            vocabulary = word_counts.len(),
            "trained classifier"
        );

        Ok(TrainedModel {
            num_posts,
            word_counts,
            labels,
        })
    }

    pub fn post_count(&self) -> usize {
        self.num_posts
    }

    pub fn vocabulary_size(&self) -> usize {
        self.word_counts.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.word_counts.keys().map(String::as_str)
    }

    pub fn posts_with_label(&self, label: &str) -> usize {
        self.labels.get(label).map_or(0, |stats| stats.num_posts)
    }

    pub fn posts_containing_word(&self, word: &str) -> usize {
        self.word_counts.get(word).copied().unwrap_or(0)
    }

    pub fn posts_with_label_containing_word(&self, label: &str, word: &str) -> usize {
        self.labels
            .get(label)
            .and_then(|stats| stats.word_counts.get(word))
            .copied()
            .unwrap_or(0)
    }

    pub fn log_prior(&self, label: &str) -> Option<f64> {
        self.labels.get(label).map(|stats| stats.log_prior)
    }

    /// `None` if either `label` or `word` was never seen in training.
    pub fn log_likelihood(&self, label: &str, word: &str) -> Option<f64> {
        self.labels
            .get(label)
            .and_then(|stats| stats.log_likelihoods.get(word))
            .copied()
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, usize, f64)> {
        self.labels
            .iter()
            .map(|(label, stats)| (label.as_str(), stats.num_posts, stats.log_prior))
    }

    /// `(label, word, co-occurrence count, log-likelihood)` for every pair that
    /// was actually observed, ordered by label and then by word.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str, usize, f64)> {
        self.labels.iter().flat_map(|(label, stats)| {
            stats.word_counts.iter().filter_map(move |(word, &count)| {
                stats
                    .log_likelihoods
                    .get(word)
                    .map(|&log_likelihood| (label.as_str(), word.as_str(), count, log_likelihood))
            })
        })
    }

    /// Score of `text` under every label, in label order.
    pub fn scores(&self, text: &str) -> Vec<(&str, f64)> {
        let words = unique_words(text);
        let unseen = (1.0 / self.num_posts as f64).ln();

        self.labels
            .iter()
            .map(|(label, stats)| {
                // Out-of-vocabulary words cost ln(1 / N) under every label.
                let score = words.iter().fold(stats.log_prior, |acc, word| {
                    acc + stats.log_likelihoods.get(*word).copied().unwrap_or(unseen)
                });
                (label.as_str(), score)
            })
            .collect()
    }

    /// Ties go to the label that comes first in label order.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let (best_label, best_score) = self
            .scores(text)
            .into_iter()
            .fold(None, |best, (label, score)| match best {
                Some((_, best_score)) if score <= best_score => best,
                _ => Some((label, score)),
            })
            .ok_or(ClassifierError::NotTrained)?;

        trace!(label = best_label, score = best_score, "predicted");

        Ok(Prediction {
            label: best_label.to_string(),
            score: best_score,
        })
    }

    pub fn evaluate(&self, records: &[Record]) -> Result<Evaluation> {
        let outcomes = records
            .iter()
            .map(|record| {
                self.predict(&record.text).map(|prediction| Outcome {
                    expected: record.label.clone(),
                    predicted: prediction.label,
                    score: prediction.score,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Evaluation { outcomes })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub expected: String,
    pub predicted: String,
    pub score: f64,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        self.expected == self.predicted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    outcomes: Vec<Outcome>,
}

impl Evaluation {
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn correct(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_correct()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// `None` for an empty test set.
    pub fn accuracy(&self) -> Option<f64> {
        if self.outcomes.is_empty() {
            None
        } else {
            Some(self.correct() as f64 / self.total() as f64)
        }
    }
}

/// A classifier that starts out untrained and holds the model of its last
/// successful training call.
#[derive(Debug, Clone, Default)]
pub struct NaiveBayesClassifier {
    model: Option<TrainedModel>,
}

impl NaiveBayesClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// On failure the previous model, if any, is kept.
    pub fn train(&mut self, records: &[Record]) -> Result<&TrainedModel> {
        let model = TrainedModel::fit(records)?;
        Ok(self.model.insert(model))
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.trained()?.predict(text)
    }

    pub fn evaluate(&self, records: &[Record]) -> Result<Evaluation> {
        self.trained()?.evaluate(records)
    }

    fn trained(&self) -> Result<&TrainedModel> {
        self.model.as_ref().ok_or(ClassifierError::NotTrained)
    }
}
