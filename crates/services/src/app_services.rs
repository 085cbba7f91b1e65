use std::sync::Arc;

use quiz_core::QuestionBank;
use quiz_core::model::QuizSettings;
use quiz_storage::repository::Storage;

use crate::error::AppServicesError;
use crate::preferences_service::DisplayPreferencesService;
use crate::progress_service::ProgressService;
use crate::sessions::QuizLoopService;

/// Question and ticket totals for the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankOverview {
    pub total_questions: usize,
    pub ticket_count: usize,
}

/// Assembles app-facing services around one loaded question bank.
#[derive(Clone)]
pub struct AppServices {
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    session_loop: Arc<QuizLoopService>,
    progress: Arc<ProgressService>,
    preferences: Arc<DisplayPreferencesService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, bank, settings))
    }

    /// Build services backed by in-memory stores.
    #[must_use]
    pub fn in_memory(bank: QuestionBank, settings: QuizSettings) -> Self {
        Self::from_storage(&Storage::in_memory(), bank, settings)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, bank: QuestionBank, settings: QuizSettings) -> Self {
        let bank = Arc::new(bank);
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.progress)));
        let preferences = Arc::new(DisplayPreferencesService::new(Arc::clone(
            &storage.settings,
        )));
        let session_loop = Arc::new(QuizLoopService::new(
            Arc::clone(&bank),
            settings,
            Arc::clone(&progress),
        ));

        Self {
            bank,
            settings,
            session_loop,
            progress,
            preferences,
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

    /// Totals computed from the loaded bank, so both always agree.
    #[must_use]
    pub fn overview(&self) -> BankOverview {
        BankOverview {
            total_questions: self.bank.len(),
            ticket_count: self.bank.ticket_count(self.settings.ticket_size()),
        }
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<DisplayPreferencesService> {
        Arc::clone(&self.preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ChoiceKey, Question};

    fn bank(len: usize) -> QuestionBank {
        QuestionBank::from_questions(
            (0..len)
                .map(|i| {
                    Question::new(
                        format!("Q{i}"),
                        ["a".into(), "b".into(), "c".into(), "d".into()],
                        ChoiceKey::C,
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn overview_matches_loaded_bank() {
        let services = AppServices::in_memory(bank(125), QuizSettings::default());
        assert_eq!(
            services.overview(),
            BankOverview {
                total_questions: 125,
                ticket_count: 3,
            }
        );
        assert_eq!(services.session_loop().ticket_count(), 3);
    }

    #[test]
    fn empty_bank_has_no_tickets() {
        let services = AppServices::in_memory(bank(0), QuizSettings::default());
        assert_eq!(services.overview().ticket_count, 0);
    }
}
