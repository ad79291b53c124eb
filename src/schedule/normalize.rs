//! Schedule normalization
//!
//! Checks, in order:
//! 1. every time is `HH:MM` (24h) after trimming
//! 2. at least one time
//! 3. no duplicate times
//! 4. days only for custom schedules, then non-empty, known and unique

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use chrono::NaiveTime;
use regex::Regex;

use super::errors::{ScheduleError, ScheduleResult};
use super::types::{ScheduleConfig, ScheduleKind, Weekday};

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern is valid")
    })
}

/// A normalized schedule together with its parsed times and days.
#[derive(Debug, Clone)]
pub(crate) struct ParsedSchedule {
    pub config: ScheduleConfig,
    /// Ascending
    pub times: Vec<NaiveTime>,
    /// Empty unless custom
    pub days: Vec<Weekday>,
}

impl ParsedSchedule {
    pub fn is_scheduled(&self, day: Weekday) -> bool {
        match self.config.kind {
            ScheduleKind::Daily => true,
            ScheduleKind::Weekdays => day.is_workday(),
            ScheduleKind::Custom => self.days.contains(&day),
        }
    }
}

/// Validates and canonicalizes a schedule configuration.
pub fn normalize_schedule(config: &ScheduleConfig) -> ScheduleResult<ScheduleConfig> {
    parse_schedule(config).map(|parsed| parsed.config)
}

/// Whether reminders fire on `day`. Normalizes first.
pub fn is_day_scheduled(config: &ScheduleConfig, day: Weekday) -> ScheduleResult<bool> {
    Ok(parse_schedule(config)?.is_scheduled(day))
}

pub(crate) fn parse_schedule(config: &ScheduleConfig) -> ScheduleResult<ParsedSchedule> {
    let times = config
        .times
        .iter()
        .map(|raw| validate_time(raw))
        .collect::<ScheduleResult<Vec<_>>>()?;

    if times.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }

    // Zero-padded HH:MM sorts lexicographically in chronological order.
    let unique_times: BTreeMap<&str, NaiveTime> = times.iter().copied().collect();
    if unique_times.len() != times.len() {
        return Err(ScheduleError::DuplicateScheduleTime);
    }

    let (sorted_times, parsed_times): (Vec<String>, Vec<NaiveTime>) = unique_times
        .into_iter()
        .map(|(text, time)| (text.to_string(), time))
        .unzip();

    let raw_days = config.days.as_deref().unwrap_or(&[]);

    match config.kind {
        ScheduleKind::Daily | ScheduleKind::Weekdays => {
            if !raw_days.is_empty() {
                return Err(ScheduleError::UnexpectedScheduleDays(config.kind));
            }

            Ok(ParsedSchedule {
                config: ScheduleConfig {
                    kind: config.kind,
                    times: sorted_times,
                    days: None,
                },
                times: parsed_times,
                days: Vec::new(),
            })
        }
        ScheduleKind::Custom => {
            if raw_days.is_empty() {
                return Err(ScheduleError::EmptyScheduleDays);
            }

            let days = raw_days
                .iter()
                .map(|raw| raw.parse::<Weekday>())
                .collect::<ScheduleResult<Vec<_>>>()?;

            let mut seen = HashSet::with_capacity(days.len());
            if !days.iter().all(|day| seen.insert(*day)) {
                return Err(ScheduleError::DuplicateScheduleDay);
            }

            Ok(ParsedSchedule {
                config: ScheduleConfig {
                    kind: ScheduleKind::Custom,
                    times: sorted_times,
                    days: Some(days.iter().map(|d| d.as_str().to_string()).collect()),
                },
                times: parsed_times,
                days,
            })
        }
    }
}

/// Trimmed `HH:MM` text and its parsed time. Errors carry the raw input.
fn validate_time(raw: &str) -> ScheduleResult<(&str, NaiveTime)> {
    let time = raw.trim();
    let invalid = || ScheduleError::InvalidScheduleTime(raw.to_string());

    if !time_pattern().is_match(time) {
        return Err(invalid());
    }
    let parsed = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| invalid())?;
    Ok((time, parsed))
}
