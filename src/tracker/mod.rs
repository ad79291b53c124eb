//! Trackers
//!
//! The layer above the two engines: tracker drafts are normalized into
//! definitions, entries are mapped onto storage rows, and reminder jobs are
//! planned from the tracker's schedule. Unlike the engines, this layer logs
//! its outcomes.

mod draft;
mod entry;
mod errors;
mod reminder;
mod seed;

pub use draft::{
    normalize_tracker, FieldDraft, TrackerDefinition, TrackerDraft, TrackerField,
    TrackerFieldRecord, TrackerLimits, TrackerRecord, DEFAULT_MAX_FIELDS,
};
pub use entry::{reconstruct_values, validate_entry, EntryValueRow};
pub use errors::{EntryIssue, TrackerError, TrackerResult};
pub use reminder::{ReminderJob, ReminderStatus};
pub use seed::{core_trackers, SeedTracker};
