mod ids;
mod progress;
mod question;
mod settings;

pub use ids::{ParseIdError, TicketNumber};
pub use progress::{ProgressError, ProgressRecord, ScoreBand, score_percent};
pub use question::{ChoiceKey, Question, QuestionError};
pub use settings::{DisplayPreferences, QuizSettings, SettingsError};
