#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod preferences_service;
pub mod progress_service;
pub mod sessions;

pub use sessions as session;

pub use app_services::{AppServices, BankOverview};
pub use error::{AppServicesError, PreferencesError, ProgressServiceError, SessionError};
pub use preferences_service::DisplayPreferencesService;
pub use progress_service::{ProgressService, TicketStanding, TicketStatus};

pub use sessions::{
    AdvanceResult, GradeResult, PersistStatus, QuizLoopService, QuizMode, QuizSession,
    SessionOutcome, SessionState,
};
