//! Schedule configuration types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ScheduleError;

/// Recurrence rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Daily,
    /// Monday through Friday
    Weekdays,
    /// An explicit set of days
    Custom,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Daily => "daily",
            ScheduleKind::Weekdays => "weekdays",
            ScheduleKind::Custom => "custom",
        }
    }

    /// Capitalized name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleKind::Daily => "Daily",
            ScheduleKind::Weekdays => "Weekday",
            ScheduleKind::Custom => "Custom",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "daily" => Ok(ScheduleKind::Daily),
            "weekdays" => Ok(ScheduleKind::Weekdays),
            "custom" => Ok(ScheduleKind::Custom),
            other => Err(ScheduleError::UnsupportedScheduleKind(other.to_string())),
        }
    }
}

/// Day-of-week token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    /// Monday through Friday
    pub fn is_workday(&self) -> bool {
        !matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    /// Case-insensitive; the error carries the token as given.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str() == lowered)
            .ok_or_else(|| ScheduleError::UnsupportedScheduleDay(raw.to_string()))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

/// Reminder schedule, raw or normalized.
///
/// Normalized form: `times` trimmed, unique and sorted; `days` absent unless
/// `kind` is custom, then lower-cased and unique in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub kind: ScheduleKind,
    pub times: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<String>>,
}

impl ScheduleConfig {
    pub fn daily<S: Into<String>>(times: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: ScheduleKind::Daily,
            times: times.into_iter().map(Into::into).collect(),
            days: None,
        }
    }

    pub fn weekdays<S: Into<String>>(times: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: ScheduleKind::Weekdays,
            times: times.into_iter().map(Into::into).collect(),
            days: None,
        }
    }

    pub fn custom<S: Into<String>, D: Into<String>>(
        times: impl IntoIterator<Item = S>,
        days: impl IntoIterator<Item = D>,
    ) -> Self {
        Self {
            kind: ScheduleKind::Custom,
            times: times.into_iter().map(Into::into).collect(),
            days: Some(days.into_iter().map(Into::into).collect()),
        }
    }

    pub fn with_days<D: Into<String>>(mut self, days: impl IntoIterator<Item = D>) -> Self {
        self.days = Some(days.into_iter().map(Into::into).collect());
        self
    }
}
