use rand::seq::SliceRandom;
use rand::{Rng, rng};

use quiz_core::QuestionBank;
use quiz_core::model::{Question, QuizSettings, TicketNumber};

use super::service::QuizMode;

/// Question list selected for a session, before the session exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub mode: QuizMode,
    pub questions: Vec<Question>,
}

impl SessionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected for this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Derives ticket and exam question lists from the bank.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    settings: QuizSettings,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, settings: QuizSettings) -> Self {
        Self { bank, settings }
    }

    /// The contiguous block of the bank that forms `ticket`.
    ///
    /// Tickets past the end of the bank produce an empty plan.
    #[must_use]
    pub fn ticket(&self, ticket: TicketNumber) -> SessionPlan {
        SessionPlan {
            mode: QuizMode::Ticket(ticket),
            questions: self.bank.ticket(ticket, self.settings.ticket_size()).to_vec(),
        }
    }

    /// A fresh random exam drawn with the thread-local generator.
    #[must_use]
    pub fn exam(&self) -> SessionPlan {
        self.exam_with_rng(&mut rng())
    }

    /// A random exam drawn with the supplied generator.
    pub fn exam_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> SessionPlan {
        SessionPlan {
            mode: QuizMode::Exam,
            questions: sample_exam_with_rng(self.bank.questions(), self.settings.exam_size(), rng),
        }
    }
}

/// Draw `min(exam_size, bank.len())` distinct questions in random order.
#[must_use]
pub fn sample_exam(bank: &[Question], exam_size: usize) -> Vec<Question> {
    sample_exam_with_rng(bank, exam_size, &mut rng())
}

/// Shuffle the whole bank with `rng` and keep the first `exam_size` questions.
pub fn sample_exam_with_rng<R: Rng + ?Sized>(
    bank: &[Question],
    exam_size: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut order: Vec<usize> = (0..bank.len()).collect();
    order.shuffle(rng);
    order
        .into_iter()
        .take(exam_size)
        .map(|index| bank[index].clone())
        .collect()
}
