//! # Reminder Schedule Engine
//!
//! Normalizes reminder schedules (daily, weekdays, custom day set; each with
//! one or more `HH:MM` times) and computes the next due instant from a
//! reference instant. Pure functions over immutable inputs.

mod errors;
mod next_due;
mod normalize;
mod types;

pub use errors::{ScheduleError, ScheduleResult};
pub use next_due::calculate_next_due_at;
pub use normalize::{is_day_scheduled, normalize_schedule};
pub use types::{ScheduleConfig, ScheduleKind, Weekday};
