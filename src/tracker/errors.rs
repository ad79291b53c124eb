//! # Tracker Errors

use std::fmt;

use thiserror::Error;

use crate::primitives::FieldError;
use crate::schedule::ScheduleError;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// One problem with one field of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryIssue {
    /// A value was supplied for a key the tracker does not declare
    UnknownField(String),
    /// The value failed its field definition
    Invalid { field_key: String, error: FieldError },
}

impl EntryIssue {
    pub fn field_key(&self) -> &str {
        match self {
            EntryIssue::UnknownField(key) => key,
            EntryIssue::Invalid { field_key, .. } => field_key,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EntryIssue::UnknownField(_) => "HABIT_UNKNOWN_FIELD",
            EntryIssue::Invalid { error, .. } => error.code(),
        }
    }
}

impl fmt::Display for EntryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryIssue::UnknownField(key) => write!(f, "Unknown field: {}", key),
            EntryIssue::Invalid { error, .. } => write!(f, "{}", error),
        }
    }
}

/// Tracker and entry errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("Tracker name is required.")]
    NameRequired,

    #[error("Tracker requires at least one field.")]
    FieldsRequired,

    #[error("Tracker cannot define more than {max} fields.")]
    TooManyFields { max: usize },

    #[error("Duplicate fieldKey: {0}")]
    DuplicateFieldKey(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Entry rejected: {}", join_issues(.0))]
    EntryRejected(Vec<EntryIssue>),

    #[error("Malformed stored tracker: {0}")]
    MalformedRecord(String),
}

fn join_issues(issues: &[EntryIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl TrackerError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            TrackerError::NameRequired => "HABIT_TRACKER_NAME_REQUIRED",
            TrackerError::FieldsRequired => "HABIT_TRACKER_FIELDS_REQUIRED",
            TrackerError::TooManyFields { .. } => "HABIT_TOO_MANY_FIELDS",
            TrackerError::DuplicateFieldKey(_) => "HABIT_DUPLICATE_FIELD_KEY",
            TrackerError::Field(e) => e.code(),
            TrackerError::Schedule(e) => e.code(),
            TrackerError::EntryRejected(_) => "HABIT_ENTRY_REJECTED",
            TrackerError::MalformedRecord(_) => "HABIT_MALFORMED_RECORD",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            TrackerError::Schedule(e) => e.status_code(),
            TrackerError::MalformedRecord(_) => 500,
            _ => 400,
        }
    }

    /// Per-field issues of a rejected entry
    pub fn issues(&self) -> &[EntryIssue] {
        match self {
            TrackerError::EntryRejected(issues) => issues,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_codes() {
        let err = TrackerError::from(ScheduleError::EmptySchedule);
        assert_eq!(err.code(), "HABIT_EMPTY_SCHEDULE");
        assert_eq!(err.to_string(), "Schedule requires at least one reminder time.");

        let err = TrackerError::from(FieldError::UnsupportedPrimitiveType("json".into()));
        assert_eq!(err.code(), "HABIT_UNSUPPORTED_PRIMITIVE_TYPE");
    }

    #[test]
    fn test_entry_rejected_lists_every_issue() {
        let err = TrackerError::EntryRejected(vec![
            EntryIssue::UnknownField("mood".into()),
            EntryIssue::Invalid {
                field_key: "reps".into(),
                error: FieldError::RequiredFieldMissing {
                    field_key: "reps".into(),
                },
            },
        ]);

        assert_eq!(
            err.to_string(),
            "Entry rejected: Unknown field: mood Field \"reps\" is required."
        );
        assert_eq!(err.issues().len(), 2);
        assert_eq!(err.issues()[1].code(), "HABIT_REQUIRED_FIELD_MISSING");
        assert_eq!(err.status_code(), 400);
    }
}
