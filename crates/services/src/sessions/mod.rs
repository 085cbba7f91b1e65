mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan, sample_exam, sample_exam_with_rng};
pub use progress::SessionProgress;
pub use service::{GradeResult, QuizMode, QuizSession, SessionOutcome, SessionState};
pub use workflow::{AdvanceResult, PersistStatus, QuizLoopService};
