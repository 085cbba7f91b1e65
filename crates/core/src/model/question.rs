use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("at least {min} non-empty options are required, found {count}")]
    TooFewOptions { count: usize, min: usize },

    #[error("correct option {0} has no text")]
    EmptyCorrectOption(ChoiceKey),

    #[error("invalid choice key: {0:?}")]
    InvalidChoiceKey(String),
}

//
// ─── CHOICE KEY ────────────────────────────────────────────────────────────────
//

/// One of the four fixed answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
}

impl ChoiceKey {
    /// All choice keys in display order.
    pub const ALL: [ChoiceKey; 4] = [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
        }
    }

    fn slot(self) -> usize {
        match self {
            ChoiceKey::A => 0,
            ChoiceKey::B => 1,
            ChoiceKey::C => 2,
            ChoiceKey::D => 3,
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceKey {
    type Err = QuestionError;

    /// Keys are matched exactly; `"a"` is not a choice key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(ChoiceKey::A),
            "B" => Ok(ChoiceKey::B),
            "C" => Ok(ChoiceKey::C),
            "D" => Ok(ChoiceKey::D),
            other => Err(QuestionError::InvalidChoiceKey(other.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Construction enforces every invariant, so a `Question` value is always
/// well formed: non-empty text, at least [`Question::MIN_OPTIONS`] non-empty
/// options, and a correct key that points at a non-empty option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    options: [String; 4],
    correct: ChoiceKey,
}

impl Question {
    /// Minimum number of non-empty options a question must offer.
    pub const MIN_OPTIONS: usize = 2;

    /// Creates a validated question.
    ///
    /// `options` are indexed in [`ChoiceKey::ALL`] order; empty strings mark
    /// unused slots.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, fewer than two options
    /// are filled in, or the correct option is empty.
    pub fn new(
        text: impl Into<String>,
        options: [String; 4],
        correct: ChoiceKey,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let count = options.iter().filter(|o| !o.is_empty()).count();
        if count < Self::MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                count,
                min: Self::MIN_OPTIONS,
            });
        }

        if options[correct.slot()].is_empty() {
            return Err(QuestionError::EmptyCorrectOption(correct));
        }

        Ok(Self {
            text,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text for the given slot; empty when the slot is unused.
    #[must_use]
    pub fn option(&self, key: ChoiceKey) -> &str {
        &self.options[key.slot()]
    }

    /// Non-empty options in key order.
    pub fn available_options(&self) -> impl Iterator<Item = (ChoiceKey, &str)> {
        ChoiceKey::ALL
            .into_iter()
            .map(|key| (key, self.option(key)))
            .filter(|(_, text)| !text.is_empty())
    }

    #[must_use]
    pub fn correct_key(&self) -> ChoiceKey {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, key: ChoiceKey) -> bool {
        self.correct == key
    }
}
