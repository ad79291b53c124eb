//! CLI command implementations
//!
//! Every command loads configuration, reads one JSON request (except
//! `seed`), and writes one JSON response. Engine rejections surface as
//! errors carrying the engine's code.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::primitives::{
    parse_primitive_type, EntryValueColumns, FieldDefinition, FieldError, FieldResult,
    FieldValidator, PatternCache,
};
use crate::schedule::{calculate_next_due_at, normalize_schedule, ScheduleConfig, ScheduleKind};
use crate::tracker::{core_trackers, normalize_tracker, FieldDraft, ReminderJob, TrackerDraft};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response};

/// `field-columns` request
#[derive(Debug, Deserialize)]
struct FieldValueRequest {
    field: FieldDraft,
    #[serde(default)]
    value: Value,
}

/// `check-columns` request
#[derive(Debug, Deserialize)]
struct StoredColumnsRequest {
    field: FieldDraft,
    columns: EntryValueColumns,
}

/// Run a CLI command
pub fn run_command(cmd: Command) -> CliResult<()> {
    let (path, explicit) = cmd.config_path();
    let config = Config::load(path, explicit)?;
    Logger::set_min_severity(config.severity()?);

    let path_str = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", path_str.as_str())]);

    let cache = PatternCache::new();
    let validator = if config.pattern_cache {
        FieldValidator::with_cache(&cache)
    } else {
        FieldValidator::new()
    };

    let data = match cmd {
        Command::FieldColumns { .. } => field_columns(read_request()?, &validator)?,
        Command::CheckColumns { .. } => check_columns(read_request()?, &validator)?,
        Command::NormalizeSchedule { .. } => schedule(read_request()?)?,
        Command::NextDue { now, .. } => next_due(read_request()?, now.unwrap_or_else(Utc::now))?,
        Command::Tracker { now, .. } => tracker(
            read_request()?,
            &config,
            &validator,
            now.unwrap_or_else(Utc::now),
        )?,
        Command::Seed { now, .. } => seed(&config, &validator, now.unwrap_or_else(Utc::now))?,
    };

    write_response(data)
}

/// Validate one value and map it onto storage columns
pub fn field_columns(request: Value, validator: &FieldValidator<'_>) -> CliResult<Value> {
    let request: FieldValueRequest = serde_json::from_value(request)?;
    let field = definition_from(&request.field)?;

    let columns = validator
        .to_storage_columns(&field, &request.value)
        .map_err(|e| rejected_field(&field, e))?;

    log_event_with_fields(Event::FieldAccepted, &[("field_key", field.field_key.as_str())]);
    Ok(serde_json::to_value(columns)?)
}

/// Validate stored columns and return the value they hold
pub fn check_columns(request: Value, validator: &FieldValidator<'_>) -> CliResult<Value> {
    let request: StoredColumnsRequest = serde_json::from_value(request)?;
    let field = definition_from(&request.field)?;

    let value = validator
        .validate_storage_columns(&field, &request.columns)
        .map_err(|e| rejected_field(&field, e))?;

    log_event_with_fields(Event::FieldAccepted, &[("field_key", field.field_key.as_str())]);
    Ok(json!({ "value": value.map(Value::from).unwrap_or(Value::Null) }))
}

/// Normalize a schedule
pub fn schedule(request: Value) -> CliResult<Value> {
    let normalized = normalized_schedule(&request)?;
    Ok(serde_json::to_value(normalized)?)
}

/// Next due instant of a schedule after `now`
pub fn next_due(request: Value, now: DateTime<Utc>) -> CliResult<Value> {
    let normalized = normalized_schedule(&request)?;
    let next = calculate_next_due_at(&normalized, now)?;
    Ok(json!({ "next_due_at": next.to_rfc3339() }))
}

/// Normalize a tracker draft and plan its first reminder
pub fn tracker(
    request: Value,
    config: &Config,
    validator: &FieldValidator<'_>,
    now: DateTime<Utc>,
) -> CliResult<Value> {
    if let Some(schedule) = request.get("schedule") {
        check_kind_token(schedule)?;
    }
    let draft: TrackerDraft = serde_json::from_value(request)?;

    let definition = normalize_tracker(&draft, &config.limits(), validator)?;
    let reminder = ReminderJob::plan(definition.name.as_str(), &definition.schedule, now)?;

    Ok(json!({
        "tracker": definition,
        "record": definition.to_record()?,
        "reminder": reminder,
    }))
}

/// The built-in trackers, normalized, each with its first reminder
pub fn seed(
    config: &Config,
    validator: &FieldValidator<'_>,
    now: DateTime<Utc>,
) -> CliResult<Value> {
    let trackers = core_trackers()
        .into_iter()
        .map(|seed| -> CliResult<Value> {
            let definition = normalize_tracker(&seed.draft, &config.limits(), validator)?;
            let reminder = ReminderJob::plan(seed.id, &definition.schedule, now)?;
            Ok(json!({
                "id": seed.id,
                "tracker": definition,
                "reminder": reminder,
            }))
        })
        .collect::<CliResult<Vec<_>>>()?;

    Ok(Value::Array(trackers))
}

fn definition_from(draft: &FieldDraft) -> FieldResult<FieldDefinition> {
    Ok(FieldDefinition {
        field_key: draft.field_key.clone(),
        primitive_type: parse_primitive_type(&draft.primitive_type)?,
        unit: draft.unit.clone(),
        validation: draft.validation.clone(),
    })
}

fn rejected_field(field: &FieldDefinition, error: FieldError) -> CliError {
    log_event_with_fields(
        Event::FieldRejected,
        &[("code", error.code()), ("field_key", field.field_key.as_str())],
    );
    error.into()
}

/// Reports an unknown `kind` as a schedule error rather than a shape error.
fn check_kind_token(request: &Value) -> CliResult<()> {
    if let Some(kind) = request.get("kind").and_then(Value::as_str) {
        kind.parse::<ScheduleKind>()?;
    }
    Ok(())
}

fn normalized_schedule(request: &Value) -> CliResult<ScheduleConfig> {
    check_kind_token(request)?;
    let config: ScheduleConfig = serde_json::from_value(request.clone())?;

    match normalize_schedule(&config) {
        Ok(normalized) => {
            let times = normalized.times.join(",");
            log_event_with_fields(
                Event::ScheduleNormalized,
                &[("kind", normalized.kind.as_str()), ("times", times.as_str())],
            );
            Ok(normalized)
        }
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(
                Event::ScheduleRejected,
                &[("code", e.code()), ("message", message.as_str())],
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-14T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_field_columns() {
        let data = field_columns(
            json!({
                "field": { "fieldKey": "focus", "primitiveType": "duration" },
                "value": 600
            }),
            &FieldValidator::new(),
        )
        .unwrap();

        assert_eq!(data["value_duration_sec"], 600);
        assert!(data["value_num"].is_null());
    }

    #[test]
    fn test_field_columns_rejection_code() {
        let err = field_columns(
            json!({
                "field": {
                    "fieldKey": "reps",
                    "primitiveType": "number",
                    "validation": { "integer": true }
                },
                "value": 3.5
            }),
            &FieldValidator::new(),
        )
        .unwrap_err();

        assert_eq!(err.code_str(), "HABIT_TYPE_MISMATCH");
        assert_eq!(err.message(), "Field \"reps\" expects an integer value.");
    }

    #[test]
    fn test_unsupported_type_code() {
        let err = field_columns(
            json!({ "field": { "fieldKey": "x", "primitiveType": "json" }, "value": 1 }),
            &FieldValidator::new(),
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "HABIT_UNSUPPORTED_PRIMITIVE_TYPE");
    }

    #[test]
    fn test_check_columns() {
        let data = check_columns(
            json!({
                "field": { "fieldKey": "done", "primitiveType": "boolean" },
                "columns": { "value_bool": true }
            }),
            &FieldValidator::new(),
        )
        .unwrap();
        assert_eq!(data, json!({ "value": true }));

        let err = check_columns(
            json!({
                "field": { "fieldKey": "done", "primitiveType": "boolean" },
                "columns": { "value_text": "yes" }
            }),
            &FieldValidator::new(),
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "HABIT_COLUMN_TYPE_MISMATCH");
    }

    #[test]
    fn test_schedule_and_next_due() {
        let data = schedule(json!({
            "kind": "custom",
            "times": ["18:30", "07:00", "07:00"],
            "days": ["MON", "wed"]
        }))
        .unwrap();
        assert_eq!(
            data,
            json!({ "kind": "custom", "times": ["07:00", "18:30"], "days": ["mon", "wed"] })
        );

        let data =
            next_due(json!({ "kind": "daily", "times": ["09:00", "13:00"] }), now()).unwrap();
        assert_eq!(data["next_due_at"], "2026-02-14T13:00:00+00:00");
    }

    #[test]
    fn test_unknown_kind_is_schedule_error() {
        let err = schedule(json!({ "kind": "monthly", "times": ["09:00"] })).unwrap_err();
        assert_eq!(err.code_str(), "HABIT_UNSUPPORTED_SCHEDULE_KIND");
    }

    #[test]
    fn test_malformed_request() {
        let err = schedule(json!({ "kind": "daily" })).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidRequest);
    }

    #[test]
    fn test_tracker_plans_reminder() {
        let data = tracker(
            json!({
                "name": "  Reading ",
                "schedule": { "kind": "weekdays", "times": ["21:00"] },
                "fields": [{ "fieldKey": "pages", "primitiveType": "number" }]
            }),
            &Config::default(),
            &FieldValidator::new(),
            now(),
        )
        .unwrap();

        assert_eq!(data["tracker"]["name"], "Reading");
        assert_eq!(data["tracker"]["fields"][0]["sortOrder"], 0);
        assert_eq!(
            data["record"]["schedule_config_json"],
            r#"{"kind":"weekdays","times":["21:00"]}"#
        );
        // 2026-02-14 is a Saturday
        assert_eq!(data["reminder"]["next_run_at"], "2026-02-16T21:00:00Z");
    }

    #[test]
    fn test_tracker_respects_field_limit() {
        let config = Config {
            max_fields_per_tracker: 1,
            ..Config::default()
        };
        let err = tracker(
            json!({
                "name": "BP",
                "schedule": { "kind": "daily", "times": ["08:00"] },
                "fields": [
                    { "fieldKey": "systolic", "primitiveType": "number" },
                    { "fieldKey": "diastolic", "primitiveType": "number" }
                ]
            }),
            &config,
            &FieldValidator::new(),
            now(),
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "HABIT_TOO_MANY_FIELDS");
    }

    #[test]
    fn test_seed() {
        let cache = PatternCache::new();
        let data = seed(&Config::default(), &FieldValidator::with_cache(&cache), now()).unwrap();
        let ids: Vec<_> = data
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            ids,
            vec!["seed-water-intake", "seed-meditation", "seed-blood-pressure"]
        );
    }
}
