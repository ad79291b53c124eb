//! Next due instant
//!
//! `now` is read as UTC wall-clock time. Day 0 only offers times strictly
//! later than `now`; a time equal to `now` counts as already passed. Later
//! days offer every configured time.

use chrono::{DateTime, Datelike, Days, TimeZone, Utc};

use super::errors::{ScheduleError, ScheduleResult};
use super::normalize::parse_schedule;
use super::types::{ScheduleConfig, ScheduleKind};

/// Days searched after today. A week covers every weekday once more, so a
/// day that is scheduled but already exhausted today is found again.
const WEEK_HORIZON: u64 = 7;

/// Computes the next instant at which `config` fires, strictly after `now`.
///
/// # Errors
///
/// Any normalization error of `config`. `ScheduleError::Internal` if no
/// instant is found within the horizon, which a normalized schedule cannot
/// produce.
pub fn calculate_next_due_at(
    config: &ScheduleConfig,
    now: DateTime<Utc>,
) -> ScheduleResult<DateTime<Utc>> {
    let schedule = parse_schedule(config)?;
    let today = now.date_naive();
    let horizon = match schedule.config.kind {
        ScheduleKind::Daily => 1,
        ScheduleKind::Weekdays | ScheduleKind::Custom => WEEK_HORIZON,
    };

    for offset in 0..=horizon {
        let day = today
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| ScheduleError::Internal(format!("date overflow after {}", today)))?;

        if !schedule.is_scheduled(day.weekday().into()) {
            continue;
        }

        // Times are ascending, so the first later one is the earliest.
        let next = schedule
            .times
            .iter()
            .map(|time| Utc.from_utc_datetime(&day.and_time(*time)))
            .find(|candidate| *candidate > now);

        if let Some(due) = next {
            return Ok(due);
        }
    }

    Err(ScheduleError::Internal(format!(
        "no due instant within {} days of {}",
        horizon + 1,
        now.to_rfc3339()
    )))
}
