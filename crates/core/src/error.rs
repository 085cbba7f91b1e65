use thiserror::Error;

use crate::bank::BankError;
use crate::model::{ProgressError, QuestionError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Bank(#[from] BankError),
}
