//! # Schedule Errors

use thiserror::Error;

use super::types::ScheduleKind;

/// Result type for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Schedule configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid schedule time: {0}")]
    InvalidScheduleTime(String),

    #[error("Schedule requires at least one reminder time.")]
    EmptySchedule,

    #[error("Schedule times must be unique.")]
    DuplicateScheduleTime,

    #[error("{} schedules must not include custom days.", .0.label())]
    UnexpectedScheduleDays(ScheduleKind),

    #[error("Custom schedules require at least one day.")]
    EmptyScheduleDays,

    #[error("Unsupported schedule day: {0}")]
    UnsupportedScheduleDay(String),

    #[error("Schedule days must be unique.")]
    DuplicateScheduleDay,

    #[error("Unsupported schedule kind: {0}")]
    UnsupportedScheduleKind(String),

    /// A normalized schedule produced no due instant
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScheduleError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::InvalidScheduleTime(_) => "HABIT_INVALID_SCHEDULE_TIME",
            ScheduleError::EmptySchedule => "HABIT_EMPTY_SCHEDULE",
            ScheduleError::DuplicateScheduleTime => "HABIT_DUPLICATE_SCHEDULE_TIME",
            ScheduleError::UnexpectedScheduleDays(_) => "HABIT_UNEXPECTED_SCHEDULE_DAYS",
            ScheduleError::EmptyScheduleDays => "HABIT_EMPTY_SCHEDULE_DAYS",
            ScheduleError::UnsupportedScheduleDay(_) => "HABIT_UNSUPPORTED_SCHEDULE_DAY",
            ScheduleError::DuplicateScheduleDay => "HABIT_DUPLICATE_SCHEDULE_DAY",
            ScheduleError::UnsupportedScheduleKind(_) => "HABIT_UNSUPPORTED_SCHEDULE_KIND",
            ScheduleError::Internal(_) => "HABIT_SCHEDULE_INTERNAL",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ScheduleError::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Whether the error is an invariant violation rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, ScheduleError::Internal(_))
    }
}
