//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// A CLI command started
    CommandStart,
    /// A CLI command finished successfully
    CommandComplete,
    /// A CLI command failed
    CommandFailed,

    // Field values
    /// Field value accepted and mapped to columns
    FieldAccepted,
    /// Field definition or value rejected
    FieldRejected,

    // Schedules
    /// Schedule normalized
    ScheduleNormalized,
    /// Schedule rejected
    ScheduleRejected,

    // Trackers
    /// Tracker draft normalized
    TrackerNormalized,
    /// Tracker draft rejected
    TrackerRejected,
    /// Entry rejected with one or more field errors
    EntryRejected,
    /// Reminder job planned or advanced
    ReminderPlanned,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CommandStart => "COMMAND_START",
            Event::CommandComplete => "COMMAND_COMPLETE",
            Event::CommandFailed => "COMMAND_FAILED",
            Event::FieldAccepted => "FIELD_ACCEPTED",
            Event::FieldRejected => "FIELD_REJECTED",
            Event::ScheduleNormalized => "SCHEDULE_NORMALIZED",
            Event::ScheduleRejected => "SCHEDULE_REJECTED",
            Event::TrackerNormalized => "TRACKER_NORMALIZED",
            Event::TrackerRejected => "TRACKER_REJECTED",
            Event::EntryRejected => "ENTRY_REJECTED",
            Event::ReminderPlanned => "REMINDER_PLANNED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::FieldAccepted | Event::ReminderPlanned => Severity::Trace,
            Event::FieldRejected
            | Event::ScheduleRejected
            | Event::TrackerRejected
            | Event::EntryRejected => Severity::Warn,
            Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
