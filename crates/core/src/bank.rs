//! Question bank loading and per-record validation.
//!
//! The bank source is a JSON array of loosely shaped records. Each record is
//! deserialized against a lenient schema and then validated into a
//! [`Question`]; records that fail either step are dropped without affecting
//! the rest of the load.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{ChoiceKey, Question, QuestionError, TicketNumber};
use crate::tickets;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// The bank source as a whole could not be read.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("cannot read question source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("question source is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("question source must be a JSON array of records")]
    NotAnArray,
}

/// Why a single raw record was left out of the bank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordRejection {
    #[error("record is not an object")]
    NotAnObject,

    #[error("record does not match the question schema: {0}")]
    Malformed(String),

    #[error("missing or empty question text")]
    MissingQuestion,

    #[error("missing options object")]
    MissingOptions,

    #[error("only {count} non-empty options")]
    TooFewOptions { count: usize },

    #[error("invalid correct answer {0:?}")]
    InvalidCorrectKey(String),

    #[error("correct option {0} is empty")]
    EmptyCorrectOption(ChoiceKey),
}

impl From<QuestionError> for RecordRejection {
    fn from(err: QuestionError) -> Self {
        match err {
            QuestionError::EmptyText => RecordRejection::MissingQuestion,
            QuestionError::TooFewOptions { count, .. } => RecordRejection::TooFewOptions { count },
            QuestionError::EmptyCorrectOption(key) => RecordRejection::EmptyCorrectOption(key),
            QuestionError::InvalidChoiceKey(raw) => RecordRejection::InvalidCorrectKey(raw),
        }
    }
}

//
// ─── RAW SCHEMA ────────────────────────────────────────────────────────────────
//

/// Wire shape of one record. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<RawOptions>,
    #[serde(default)]
    correct: Option<String>,
}

/// Option slots keep whatever JSON they hold; non-text scalars are read as text.
#[derive(Debug, Default, Deserialize)]
struct RawOptions {
    #[serde(rename = "A", default)]
    a: Option<Value>,
    #[serde(rename = "B", default)]
    b: Option<Value>,
    #[serde(rename = "C", default)]
    c: Option<Value>,
    #[serde(rename = "D", default)]
    d: Option<Value>,
}

fn slot_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
        _ => String::new(),
    }
}

impl RawOptions {
    fn into_slots(self) -> [String; 4] {
        [
            slot_text(self.a),
            slot_text(self.b),
            slot_text(self.c),
            slot_text(self.d),
        ]
    }
}

/// Validate one raw record into a [`Question`].
///
/// Rules, in order: non-empty `question` text; an `options` object; at least
/// two of the `A`..`D` options non-empty; `correct` naming one of `A`..`D`
/// whose option is non-empty.
///
/// # Errors
///
/// Returns the first `RecordRejection` the record runs into.
pub fn validate_record(record: &Value) -> Result<Question, RecordRejection> {
    if !record.is_object() {
        return Err(RecordRejection::NotAnObject);
    }

    let raw = RawQuestion::deserialize(record)
        .map_err(|err| RecordRejection::Malformed(err.to_string()))?;

    let text = raw
        .question
        .filter(|text| !text.is_empty())
        .ok_or(RecordRejection::MissingQuestion)?;
    let options = raw.options.ok_or(RecordRejection::MissingOptions)?.into_slots();

    let count = options.iter().filter(|o| !o.is_empty()).count();
    if count < Question::MIN_OPTIONS {
        return Err(RecordRejection::TooFewOptions { count });
    }

    let correct_raw = raw.correct.unwrap_or_default();
    let correct: ChoiceKey = correct_raw
        .parse()
        .map_err(|_| RecordRejection::InvalidCorrectKey(correct_raw.clone()))?;

    Ok(Question::new(text, options, correct)?)
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Ordered, immutable set of valid questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from already-validated questions, keeping their order.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Validate every record, keeping valid ones in input order.
    ///
    /// Never fails: invalid records are skipped and only show up as a smaller
    /// bank.
    #[must_use]
    pub fn load(records: &[Value]) -> Self {
        let questions: Vec<Question> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match validate_record(record) {
                Ok(question) => Some(question),
                Err(reason) => {
                    tracing::debug!(index, %reason, "skipping question record");
                    None
                }
            })
            .collect();

        tracing::debug!(
            records = records.len(),
            valid = questions.len(),
            "question bank loaded"
        );
        Self { questions }
    }

    /// Parse raw records out of a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the document is not JSON or not an array.
    pub fn read_source(json: &str) -> Result<Vec<Value>, BankError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(records) => Ok(records),
            _ => Err(BankError::NotAnArray),
        }
    }

    /// Load a bank from a JSON document, reporting an unreadable source.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the document cannot be parsed as a record array.
    pub fn try_from_json_str(json: &str) -> Result<Self, BankError> {
        Self::read_source(json).map(|records| Self::load(&records))
    }

    /// Load a bank from a file, reporting an unreadable source.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the file cannot be read or parsed.
    pub fn try_from_path(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::try_from_json_str(&json)
    }

    /// Load a bank from a JSON document; an unreadable source yields an empty bank.
    #[must_use]
    pub fn from_json_str(json: &str) -> Self {
        Self::try_from_json_str(json).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "question source unreadable, using empty bank");
            Self::default()
        })
    }

    /// Load a bank from a file; an unreadable source yields an empty bank.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::try_from_path(path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "question source unreadable, using empty bank");
            Self::default()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// Number of tickets of `ticket_size` questions this bank splits into.
    #[must_use]
    pub fn ticket_count(&self, ticket_size: usize) -> usize {
        tickets::ticket_count(self.len(), ticket_size)
    }

    /// Questions of `ticket`, empty if the ticket lies past the end.
    #[must_use]
    pub fn ticket(&self, ticket: TicketNumber, ticket_size: usize) -> &[Question] {
        tickets::ticket_slice(&self.questions, ticket, ticket_size)
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
