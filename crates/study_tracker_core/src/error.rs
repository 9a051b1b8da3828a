//! crates/study_tracker_core/src/error.rs
//!
//! The failures an engine operation can report to the presentation layer.

use crate::ports::PortError;

/// Every recoverable failure of a progression operation.
///
/// Presentation code matches on the variant (or [`ProgressError::code`])
/// instead of parsing the message.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("You don't have an active session.")]
    NotStarted,
    #[error("You have an active session.")]
    AlreadyRunning,
    #[error("The timer is already paused, resume it before starting a new break.")]
    AlreadyPaused,
    #[error("The timer is not paused.")]
    NotPaused,
    #[error("You cannot end the session while the timer is paused.")]
    CannotStopWhilePaused,
    #[error("You don't have a study tracker account.")]
    NoAccount,
    #[error("You don't have an active term.")]
    NoActiveTerm,
    #[error("Course '{0}' already exists.")]
    DuplicateCourse(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An account already exists for user '{0}'.")]
    DuplicateAccount(String),
    #[error("Term '{0}' is already active, end it before starting a new one.")]
    TermAlreadyActive(String),
    #[error("Course '{0}' is not registered.")]
    CourseNotFound(String),

    /// The store failed; the caller owns retry and rollback.
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ProgressError {
    /// Stable identifier for each failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            ProgressError::NotStarted => "not_started",
            ProgressError::AlreadyRunning => "already_running",
            ProgressError::AlreadyPaused => "already_paused",
            ProgressError::NotPaused => "not_paused",
            ProgressError::CannotStopWhilePaused => "cannot_stop_while_paused",
            ProgressError::NoAccount => "no_account",
            ProgressError::NoActiveTerm => "no_active_term",
            ProgressError::DuplicateCourse(_) => "duplicate_course",
            ProgressError::InvalidInput(_) => "invalid_input",
            ProgressError::DuplicateAccount(_) => "duplicate_account",
            ProgressError::TermAlreadyActive(_) => "term_already_active",
            ProgressError::CourseNotFound(_) => "course_not_found",
            ProgressError::Storage(_) => "storage",
        }
    }
}

pub type ProgressResult<T> = Result<T, ProgressError>;
