//! Reminder jobs
//!
//! One job per tracker. `next_run_at` always comes from the schedule engine
//! and is strictly later than the instant it was computed from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};
use crate::schedule::{calculate_next_due_at, ScheduleConfig, ScheduleResult};

/// Job state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Scheduled,
    Paused,
}

/// A reminder job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderJob {
    pub id: Uuid,
    pub tracker_id: String,
    pub next_run_at: DateTime<Utc>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub status: ReminderStatus,
    pub last_error: Option<String>,
}

impl ReminderJob {
    /// Plan the first run after `now`
    pub fn plan(
        tracker_id: impl Into<String>,
        schedule: &ScheduleConfig,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Self> {
        let job = Self {
            id: Uuid::new_v4(),
            tracker_id: tracker_id.into(),
            next_run_at: calculate_next_due_at(schedule, now)?,
            last_run_at: None,
            status: ReminderStatus::Scheduled,
            last_error: None,
        };
        job.log_planned();
        Ok(job)
    }

    /// Whether the job should fire at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == ReminderStatus::Scheduled && self.next_run_at <= now
    }

    /// Record a successful run and advance past `now`
    pub fn mark_run(
        &mut self,
        schedule: &ScheduleConfig,
        now: DateTime<Utc>,
    ) -> ScheduleResult<()> {
        let next = calculate_next_due_at(schedule, now)?;
        self.last_run_at = Some(now);
        self.last_error = None;
        self.next_run_at = next;
        self.log_planned();
        Ok(())
    }

    /// Record a failed run; the job still advances so it does not refire at once
    pub fn mark_failed(
        &mut self,
        schedule: &ScheduleConfig,
        now: DateTime<Utc>,
        error: impl Into<String>,
    ) -> ScheduleResult<()> {
        let next = calculate_next_due_at(schedule, now)?;
        self.last_run_at = Some(now);
        self.last_error = Some(error.into());
        self.next_run_at = next;
        self.log_planned();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.status = ReminderStatus::Paused;
    }

    /// Resume and recompute from `now`; runs missed while paused are skipped
    pub fn resume(&mut self, schedule: &ScheduleConfig, now: DateTime<Utc>) -> ScheduleResult<()> {
        self.next_run_at = calculate_next_due_at(schedule, now)?;
        self.status = ReminderStatus::Scheduled;
        self.log_planned();
        Ok(())
    }

    fn log_planned(&self) {
        let id = self.id.to_string();
        let next = self.next_run_at.to_rfc3339();
        log_event_with_fields(
            Event::ReminderPlanned,
            &[
                ("job_id", id.as_str()),
                ("tracker_id", self.tracker_id.as_str()),
                ("next_run_at", next.as_str()),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_plan_uses_next_due() {
        let schedule = ScheduleConfig::daily(["09:00", "13:00", "18:00"]);
        let job =
            ReminderJob::plan("seed-water-intake", &schedule, at("2026-02-14T10:00:00Z")).unwrap();

        assert_eq!(job.next_run_at, at("2026-02-14T13:00:00Z"));
        assert_eq!(job.status, ReminderStatus::Scheduled);
        assert!(job.last_run_at.is_none());
    }

    #[test]
    fn test_due_and_advance() {
        let schedule = ScheduleConfig::weekdays(["07:30"]);
        let mut job = ReminderJob::plan("t", &schedule, at("2026-02-13T08:00:00Z")).unwrap();
        assert_eq!(job.next_run_at, at("2026-02-16T07:30:00Z"));

        assert!(!job.is_due(at("2026-02-16T07:29:59Z")));
        assert!(job.is_due(at("2026-02-16T07:30:00Z")));

        job.mark_run(&schedule, at("2026-02-16T07:30:00Z")).unwrap();
        assert_eq!(job.last_run_at, Some(at("2026-02-16T07:30:00Z")));
        assert_eq!(job.next_run_at, at("2026-02-17T07:30:00Z"));
    }

    #[test]
    fn test_failure_recorded_and_cleared() {
        let schedule = ScheduleConfig::daily(["08:00"]);
        let mut job = ReminderJob::plan("t", &schedule, at("2026-02-14T07:00:00Z")).unwrap();

        job.mark_failed(&schedule, at("2026-02-14T08:00:00Z"), "push token expired").unwrap();
        assert_eq!(job.last_error.as_deref(), Some("push token expired"));
        assert_eq!(job.next_run_at, at("2026-02-15T08:00:00Z"));

        job.mark_run(&schedule, at("2026-02-15T08:00:00Z")).unwrap();
        assert_eq!(job.last_error, None);
    }

    #[test]
    fn test_paused_job_is_never_due() {
        let schedule = ScheduleConfig::daily(["08:00"]);
        let mut job = ReminderJob::plan("t", &schedule, at("2026-02-14T07:00:00Z")).unwrap();
        job.pause();
        assert!(!job.is_due(at("2026-02-20T00:00:00Z")));

        job.resume(&schedule, at("2026-02-20T09:00:00Z")).unwrap();
        assert_eq!(job.next_run_at, at("2026-02-21T08:00:00Z"));
        assert!(job.is_due(at("2026-02-21T08:00:00Z")));
    }

    #[test]
    fn test_json_shape() {
        let schedule = ScheduleConfig::daily(["08:00"]);
        let job = ReminderJob::plan("t", &schedule, at("2026-02-14T07:00:00Z")).unwrap();
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["status"], "scheduled");
        assert_eq!(value["tracker_id"], "t");
        assert!(value["last_run_at"].is_null());
    }
}
