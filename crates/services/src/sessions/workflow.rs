use std::sync::Arc;

use quiz_core::QuestionBank;
use quiz_core::model::{ChoiceKey, QuizSettings, TicketNumber};

use super::plan::{SessionBuilder, SessionPlan};
use super::service::{GradeResult, QuizMode, QuizSession, SessionOutcome, SessionState};
use crate::error::{ProgressServiceError, SessionError};
use crate::progress_service::ProgressService;

/// What happened to the ticket result when a session finished.
#[derive(Debug)]
pub enum PersistStatus {
    /// Nothing to persist: the session is still running or is an exam.
    NotApplicable,
    Saved,
    /// The store rejected the write; the outcome is still valid.
    Failed(ProgressServiceError),
}

impl PersistStatus {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistStatus::Failed(_))
    }
}

/// Result of advancing past the current question.
#[derive(Debug)]
pub struct AdvanceResult {
    pub state: SessionState,
    pub outcome: Option<SessionOutcome>,
    pub persist: PersistStatus,
}

/// Orchestrates session start, grading and result persistence.
#[derive(Clone)]
pub struct QuizLoopService {
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    progress: Arc<ProgressService>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        bank: Arc<QuestionBank>,
        settings: QuizSettings,
        progress: Arc<ProgressService>,
    ) -> Self {
        Self {
            bank,
            settings,
            progress,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// Number of tickets the loaded bank splits into.
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.bank.ticket_count(self.settings.ticket_size())
    }

    /// Start a session over the questions of `ticket`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if no questions were loaded, or
    /// `SessionError::Empty` if the ticket holds no questions.
    pub fn start_ticket(&self, ticket: TicketNumber) -> Result<QuizSession, SessionError> {
        self.start(QuizMode::Ticket(ticket))
    }

    /// Start a session over a freshly sampled exam.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` if no questions were loaded.
    pub fn start_exam(&self) -> Result<QuizSession, SessionError> {
        self.start(QuizMode::Exam)
    }

    /// Start a session for the given mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyBank` or `SessionError::Empty` when the
    /// mode selects no questions.
    pub fn start(&self, mode: QuizMode) -> Result<QuizSession, SessionError> {
        if self.bank.is_empty() {
            return Err(SessionError::EmptyBank);
        }

        let builder = SessionBuilder::new(&self.bank, self.settings);
        let SessionPlan { mode, questions } = match mode {
            QuizMode::Ticket(ticket) => builder.ticket(ticket),
            QuizMode::Exam => builder.exam(),
        };
        if questions.is_empty() {
            tracing::info!(?mode, "requested session has no questions");
            return Err(SessionError::Empty);
        }

        tracing::info!(?mode, questions = questions.len(), "session started");
        QuizSession::new(mode, questions)
    }

    /// Grade the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if the session is already complete.
    pub fn answer_current(
        &self,
        session: &mut QuizSession,
        selected: ChoiceKey,
    ) -> Result<GradeResult, SessionError> {
        let result = session.grade(selected)?;
        tracing::debug!(
            index = session.current_index(),
            selected = %result.selected,
            correct = %result.correct_key,
            is_correct = result.is_correct,
            "answer graded"
        );
        Ok(result)
    }

    /// Advance past the graded question, recording the ticket result when the
    /// session completes.
    ///
    /// A failed write is reported through [`PersistStatus::Failed`] and never
    /// hides the outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswered` or `SessionError::Completed` for
    /// state-machine misuse.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceResult, SessionError> {
        let state = session.advance()?;
        if state != SessionState::Completed {
            return Ok(AdvanceResult {
                state,
                outcome: None,
                persist: PersistStatus::NotApplicable,
            });
        }

        let outcome = session.outcome();
        if let Some(outcome) = outcome {
            tracing::info!(
                mode = ?session.mode(),
                correct = outcome.correct,
                total = outcome.total,
                percent = outcome.percent,
                "session completed"
            );
        }

        let persist = match self.record_result(session).await {
            Ok(true) => PersistStatus::Saved,
            Ok(false) => PersistStatus::NotApplicable,
            Err(err) => {
                tracing::error!(error = %err, "failed to record ticket result");
                PersistStatus::Failed(err)
            }
        };

        Ok(AdvanceResult {
            state,
            outcome,
            persist,
        })
    }

    /// Retry persisting the result of a completed ticket session.
    ///
    /// Does nothing if the result was already recorded or the session is an exam.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` if questions remain, or
    /// `SessionError::Progress` if the write fails again.
    pub async fn finalize_result(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        if !session.is_complete() {
            return Err(SessionError::NotCompleted);
        }
        self.record_result(session).await?;
        Ok(())
    }

    /// Reset the session to its first question, keeping the same question list.
    pub fn restart(&self, session: &mut QuizSession) {
        tracing::debug!(mode = ?session.mode(), "session restarted");
        session.restart();
    }

    async fn record_result(&self, session: &mut QuizSession) -> Result<bool, ProgressServiceError> {
        let Some(ticket) = session.mode().ticket() else {
            return Ok(false);
        };
        if session.result_recorded() {
            return Ok(false);
        }

        self.progress
            .record_ticket_result(ticket, session.correct_count(), session.total_u32())
            .await?;
        session.mark_result_recorded();
        Ok(true)
    }
}
