//! Console rendering of training summaries and test results.

use std::{
    fmt,
    io::{self, Write},
};

use crate::{
    bayes::{Evaluation, TrainedModel},
    record::Record,
};

const SIGNIFICANT_DIGITS: i32 = 3;

/// Formats a float like C's `%.3g`: three significant digits, trailing zeros
/// dropped, scientific notation for very large or very small magnitudes.
#[derive(Debug, Clone, Copy)]
pub struct Sig3(pub f64);

impl fmt::Display for Sig3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }

        // The exponent has to be taken after rounding, so let `{:e}` do it.
        let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
        let (mantissa, exponent) = scientific.split_once('e').ok_or(fmt::Error)?;
        let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

        if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(
                f,
                "{}e{}{:02}",
                trim_fraction(mantissa),
                sign,
                exponent.abs()
            )
        } else {
            let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
            f.write_str(trim_fraction(&format!("{:.*}", decimals, value)))
        }
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Writes the training summary.
///
/// With `debug` set this also lists every training record, the vocabulary
/// size, each class with its prior and every observed (label, word) parameter.
pub fn write_training<W: Write>(
    out: &mut W,
    records: &[Record],
    model: &TrainedModel,
    debug: bool,
) -> io::Result<()> {
    if debug {
        writeln!(out, "training data:")?;
        for record in records {
            writeln!(out, "  label = {}, content = {}", record.label, record.text)?;
        }
    }

    writeln!(out, "trained on {} examples", model.post_count())?;

    if debug {
        writeln!(out, "vocabulary size = {}", model.vocabulary_size())?;
        writeln!(out)?;
        writeln!(out, "classes:")?;
        for (label, posts, log_prior) in model.classes() {
            writeln!(
                out,
                "  {}, {} examples, log-prior = {}",
                label,
                posts,
                Sig3(log_prior)
            )?;
        }
        writeln!(out, "classifier parameters:")?;
        for (label, word, count, log_likelihood) in model.parameters() {
            writeln!(
                out,
                "  {}:{}, count = {}, log-likelihood = {}",
                label,
                word,
                count,
                Sig3(log_likelihood)
            )?;
        }
    }

    Ok(())
}

/// Writes one block per test record followed by the overall tally.
///
/// `records` and `evaluation` must come from the same test set.
pub fn write_evaluation<W: Write>(
    out: &mut W,
    records: &[Record],
    evaluation: &Evaluation,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "test data:")?;
    for (record, outcome) in records.iter().zip(evaluation.outcomes()) {
        writeln!(
            out,
            "  correct = {}, predicted = {}, log-probability score = {}",
            outcome.expected,
            outcome.predicted,
            Sig3(outcome.score)
        )?;
        writeln!(out, "  content = {}", record.text)?;
        writeln!(out)?;
    }
    writeln!(
        out,
        "performance: {} / {} posts predicted correctly",
        evaluation.correct(),
        evaluation.total()
    )?;

    Ok(())
}
