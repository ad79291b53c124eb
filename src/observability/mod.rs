//! Observability
//!
//! Structured JSON logging with a typed event vocabulary.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! The value and schedule engines never log; callers log outcomes.
//!
//! # Usage
//!
//! ```ignore
//! use habitrack::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::FieldRejected, &[("field_key", "reps")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
