use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("ticket size must be > 0")]
    InvalidTicketSize,

    #[error("exam size must be > 0")]
    InvalidExamSize,
}

/// Sizing rules for deriving question lists from the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    ticket_size: u32,
    exam_size: u32,
}

impl QuizSettings {
    pub const DEFAULT_TICKET_SIZE: u32 = 60;
    pub const DEFAULT_EXAM_SIZE: u32 = 60;

    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if either size is zero.
    pub fn new(ticket_size: u32, exam_size: u32) -> Result<Self, SettingsError> {
        if ticket_size == 0 {
            return Err(SettingsError::InvalidTicketSize);
        }
        if exam_size == 0 {
            return Err(SettingsError::InvalidExamSize);
        }
        Ok(Self {
            ticket_size,
            exam_size,
        })
    }

    /// Questions per ticket.
    #[must_use]
    pub fn ticket_size(&self) -> usize {
        usize::try_from(self.ticket_size).unwrap_or(usize::MAX)
    }

    /// Upper bound on questions per exam.
    #[must_use]
    pub fn exam_size(&self) -> usize {
        usize::try_from(self.exam_size).unwrap_or(usize::MAX)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            ticket_size: Self::DEFAULT_TICKET_SIZE,
            exam_size: Self::DEFAULT_EXAM_SIZE,
        }
    }
}

/// Presentation preferences handed to whichever component renders the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub dark_theme: bool,
}

impl DisplayPreferences {
    #[must_use]
    pub fn toggled(self) -> Self {
        Self {
            dark_theme: !self.dark_theme,
        }
    }
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self { dark_theme: true }
    }
}
