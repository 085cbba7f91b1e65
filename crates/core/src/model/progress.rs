use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("total must be > 0")]
    ZeroTotal,

    #[error("score ({score}) exceeds total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Integer percentage of `correct` out of `total`, rounded down.
///
/// Returns 0 when `total` is 0.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = u64::from(correct) * 100 / u64::from(total);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Fixed classification of a percentage score.
///
/// Used both for the end-of-session verdict and for ticket status colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 90% and above.
    Excellent,
    /// From 70% up to 90%.
    Good,
    /// Below 70%.
    NeedsReview,
}

impl ScoreBand {
    pub const EXCELLENT_MIN: u32 = 90;
    pub const GOOD_MIN: u32 = 70;

    #[must_use]
    pub fn from_percent(percent: u32) -> Self {
        if percent >= Self::EXCELLENT_MIN {
            ScoreBand::Excellent
        } else if percent >= Self::GOOD_MIN {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsReview
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::NeedsReview => "needs review",
        }
    }
}

/// Persisted result of the latest completed attempt at a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    score: u32,
    total: u32,
}

impl ProgressRecord {
    /// Creates a record for a finished ticket.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ZeroTotal` if `total` is 0, or
    /// `ProgressError::ScoreExceedsTotal` if more answers were correct than asked.
    pub fn new(score: u32, total: u32) -> Result<Self, ProgressError> {
        if total == 0 {
            return Err(ProgressError::ZeroTotal);
        }
        if score > total {
            return Err(ProgressError::ScoreExceedsTotal { score, total });
        }
        Ok(Self { score, total })
    }

    /// Rehydrate a record from raw stored integers.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if either value is negative, out of range or
    /// violates the invariants of [`ProgressRecord::new`].
    pub fn from_persisted(score: i64, total: i64) -> Result<Self, ProgressError> {
        let total = u32::try_from(total).map_err(|_| ProgressError::ZeroTotal)?;
        let score = u32::try_from(score).map_err(|_| ProgressError::ScoreExceedsTotal {
            score: u32::MAX,
            total,
        })?;
        Self::new(score, total)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        score_percent(self.score, self.total)
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percent(self.percent())
    }
}
