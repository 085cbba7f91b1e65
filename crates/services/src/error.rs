//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ProgressError;
use quiz_storage::repository::StorageError;
use quiz_storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DisplayPreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by quiz sessions and the session workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions loaded")]
    EmptyBank,
    #[error("no questions available for session")]
    Empty,
    #[error("question index {index} is out of range for {len} questions")]
    OutOfRange { index: usize, len: usize },
    #[error("current question has not been answered")]
    NotAnswered,
    #[error("session already completed")]
    Completed,
    #[error("session is not completed yet")]
    NotCompleted,
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
