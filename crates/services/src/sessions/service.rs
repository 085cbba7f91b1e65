use std::fmt;

use quiz_core::model::{ChoiceKey, Question, ScoreBand, TicketNumber, score_percent};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SESSION TYPES ─────────────────────────────────────────────────────────────
//

/// Where a session's questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    /// A fixed contiguous block of the bank. Results are persisted.
    Ticket(TicketNumber),
    /// A random sample of the bank. Results are never persisted.
    Exam,
}

impl QuizMode {
    #[must_use]
    pub fn ticket(&self) -> Option<TicketNumber> {
        match self {
            QuizMode::Ticket(ticket) => Some(*ticket),
            QuizMode::Exam => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress { index: usize },
    Completed,
}

/// Outcome of grading the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeResult {
    pub is_correct: bool,
    pub selected: ChoiceKey,
    pub correct_key: ChoiceKey,
}

/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    pub band: ScoreBand,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a ticket or an exam.
///
/// The question list is fixed for the lifetime of the session. Each question
/// is graded at most once and the session only moves forward once the current
/// question has been graded.
pub struct QuizSession {
    mode: QuizMode,
    questions: Vec<Question>,
    current: usize,
    correct_count: u32,
    current_grade: Option<GradeResult>,
    result_recorded: bool,
}

impl QuizSession {
    /// Create a session over a non-empty question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(mode: QuizMode, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            mode,
            questions,
            current: 0,
            correct_count: 0,
            current_grade: None,
            result_recorded: false,
        })
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Whether the current question has already been graded.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.current_grade.is_some()
    }

    /// Grade given to the current question, if any.
    #[must_use]
    pub fn current_grade(&self) -> Option<GradeResult> {
        self.current_grade
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Completed
        } else {
            SessionState::InProgress {
                index: self.current,
            }
        }
    }

    /// Correct answers against questions graded so far.
    #[must_use]
    pub fn running_score(&self) -> (u32, usize) {
        let attempted = self.current + usize::from(self.is_answered());
        (self.correct_count, attempted)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total();
        let answered = (self.current + usize::from(self.is_answered())).min(total);
        let percent = if total == 0 {
            0
        } else {
            self.current.min(total) * 100 / total
        };
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(self.current),
            percent,
            is_complete: self.is_complete(),
        }
    }

    /// The question awaiting an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` once the session has moved past the
    /// last question.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.current)
            .ok_or(SessionError::OutOfRange {
                index: self.current,
                len: self.questions.len(),
            })
    }

    /// Grade `selected` against the current question.
    ///
    /// Grading an already graded question returns the first result unchanged
    /// and does not touch the score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if the session is already complete.
    pub fn grade(&mut self, selected: ChoiceKey) -> Result<GradeResult, SessionError> {
        if let Some(existing) = self.current_grade {
            return Ok(existing);
        }

        let question = self.current_question()?;
        let result = GradeResult {
            is_correct: question.is_correct(selected),
            selected,
            correct_key: question.correct_key(),
        };

        if result.is_correct {
            self.correct_count = self.correct_count.saturating_add(1);
        }
        self.current_grade = Some(result);
        Ok(result)
    }

    /// Move past the graded current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if there is nothing left to advance
    /// past, or `SessionError::NotAnswered` if the current question is ungraded.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.current_grade.is_none() {
            return Err(SessionError::NotAnswered);
        }

        self.current += 1;
        self.current_grade = None;
        Ok(self.state())
    }

    /// Start over with the same questions in the same order.
    pub fn restart(&mut self) {
        self.current = 0;
        self.correct_count = 0;
        self.current_grade = None;
        self.result_recorded = false;
    }

    /// Final score as a whole percentage, rounded down.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` while questions remain.
    pub fn final_score_percent(&self) -> Result<u32, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotCompleted);
        }
        Ok(score_percent(self.correct_count, self.total_u32()))
    }

    /// Final tally, available once the session is complete.
    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        let percent = self.final_score_percent().ok()?;
        Some(SessionOutcome {
            correct: self.correct_count,
            total: self.total_u32(),
            percent,
            band: ScoreBand::from_percent(percent),
        })
    }

    pub(crate) fn total_u32(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn result_recorded(&self) -> bool {
        self.result_recorded
    }

    pub(crate) fn mark_result_recorded(&mut self) {
        self.result_recorded = true;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("correct_count", &self.correct_count)
            .field("answered", &self.is_answered())
            .field("result_recorded", &self.result_recorded)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
