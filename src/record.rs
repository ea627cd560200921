//! Labeled posts and the CSV source they are read from.
//!
//! Input files carry a header row with (at least) a `tag` column holding the
//! label and a `content` column holding the post text. Other columns are
//! ignored and the two required columns may appear in any order.

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;

use crate::error::{ClassifierError, Result};

const LABEL_COLUMN: &str = "tag";
const TEXT_COLUMN: &str = "content";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    #[serde(rename = "tag")]
    pub label: String,
    #[serde(rename = "content")]
    pub text: String,
}

impl Record {
    pub fn new<L: Into<String>, T: Into<String>>(label: L, text: T) -> Self {
        Record {
            label: label.into(),
            text: text.into(),
        }
    }
}

pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_records_from(file, &path.display().to_string())
}

/// `source_name` is only used to label errors.
pub fn read_records_from<R: Read>(reader: R, source_name: &str) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?;
    for column in [LABEL_COLUMN, TEXT_COLUMN] {
        if !headers.iter().any(|header| header == column) {
            return Err(ClassifierError::malformed(
                source_name,
                format!("missing required column `{column}`"),
            ));
        }
    }

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }

    Ok(records)
}
