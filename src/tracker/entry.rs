//! Entry values
//!
//! An entry logs one value per declared field. Every field is checked, and
//! all failures are reported together in field order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::primitives::{EntryValueColumns, FieldValidator};

use super::draft::TrackerDefinition;
use super::errors::{EntryIssue, TrackerError, TrackerResult};

/// Storage row for one field of one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryValueRow {
    pub field_key: String,
    #[serde(flatten)]
    pub columns: EntryValueColumns,
}

/// Maps raw entry values onto storage rows, one per declared field.
///
/// Absent keys are treated as null. Undeclared keys are rejected.
pub fn validate_entry(
    tracker: &TrackerDefinition,
    values: &Map<String, Value>,
    validator: &FieldValidator<'_>,
) -> TrackerResult<Vec<EntryValueRow>> {
    let mut issues = unknown_keys(tracker, values.keys().map(String::as_str));
    let mut rows = Vec::with_capacity(tracker.fields.len());

    for field in &tracker.fields {
        let key = &field.definition.field_key;
        let value = values.get(key).unwrap_or(&Value::Null);

        match validator.to_storage_columns(&field.definition, value) {
            Ok(columns) => rows.push(EntryValueRow {
                field_key: key.clone(),
                columns,
            }),
            Err(error) => issues.push(EntryIssue::Invalid {
                field_key: key.clone(),
                error,
            }),
        }
    }

    reject_or(issues, rows)
}

/// Rebuilds `field_key -> value` from stored rows, re-validating each.
///
/// A declared field without a row reads as all-null columns.
pub fn reconstruct_values(
    tracker: &TrackerDefinition,
    rows: &[EntryValueRow],
    validator: &FieldValidator<'_>,
) -> TrackerResult<Map<String, Value>> {
    let mut issues = unknown_keys(tracker, rows.iter().map(|r| r.field_key.as_str()));
    let mut values = Map::new();
    let empty = EntryValueColumns::empty();

    for field in &tracker.fields {
        let key = &field.definition.field_key;
        let columns = rows
            .iter()
            .find(|r| &r.field_key == key)
            .map(|r| &r.columns)
            .unwrap_or(&empty);

        match validator.validate_storage_columns(&field.definition, columns) {
            Ok(value) => {
                values.insert(
                    key.clone(),
                    value.map(Value::from).unwrap_or(Value::Null),
                );
            }
            Err(error) => issues.push(EntryIssue::Invalid {
                field_key: key.clone(),
                error,
            }),
        }
    }

    reject_or(issues, values)
}

fn unknown_keys<'a>(
    tracker: &TrackerDefinition,
    keys: impl Iterator<Item = &'a str>,
) -> Vec<EntryIssue> {
    keys.filter(|key| tracker.field(key).is_none())
        .map(|key| EntryIssue::UnknownField(key.to_string()))
        .collect()
}

fn reject_or<T>(issues: Vec<EntryIssue>, ok: T) -> TrackerResult<T> {
    if issues.is_empty() {
        return Ok(ok);
    }

    let count = issues.len().to_string();
    let keys = issues
        .iter()
        .map(EntryIssue::field_key)
        .collect::<Vec<_>>()
        .join(",");
    log_event_with_fields(
        Event::EntryRejected,
        &[("issues", count.as_str()), ("field_keys", keys.as_str())],
    );

    Err(TrackerError::EntryRejected(issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{FieldError, PrimitiveValidation};
    use crate::schedule::ScheduleConfig;
    use crate::tracker::draft::{normalize_tracker, FieldDraft, TrackerDraft, TrackerLimits};
    use serde_json::json;

    fn blood_pressure() -> TrackerDefinition {
        let draft = TrackerDraft {
            name: "Blood Pressure".into(),
            description: None,
            schedule: ScheduleConfig::daily(["08:00", "20:00"]),
            fields: vec![
                FieldDraft::new("systolic", "number").with_validation(
                    PrimitiveValidation::range(Some(70.0), Some(260.0))
                        .with_integer(true)
                        .with_required(true),
                ),
                FieldDraft::new("diastolic", "number").with_validation(
                    PrimitiveValidation::range(Some(40.0), Some(180.0)).with_integer(true),
                ),
                FieldDraft::new("note", "text"),
            ],
        };
        normalize_tracker(&draft, &TrackerLimits::default(), &FieldValidator::new()).unwrap()
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_valid_entry_maps_every_field() {
        let tracker = blood_pressure();
        let rows = validate_entry(
            &tracker,
            &as_map(json!({ "systolic": 120, "diastolic": 80 })),
            &FieldValidator::new(),
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].field_key, "systolic");
        assert_eq!(rows[0].columns.value_num, Some(120.0));
        assert_eq!(rows[2].columns, EntryValueColumns::empty());
    }

    #[test]
    fn test_all_issues_reported_together() {
        let tracker = blood_pressure();
        let err = validate_entry(
            &tracker,
            &as_map(json!({ "diastolic": 80.5, "note": 3, "mood": "ok" })),
            &FieldValidator::new(),
        )
        .unwrap_err();

        let keys: Vec<_> = err.issues().iter().map(EntryIssue::field_key).collect();
        assert_eq!(keys, vec!["mood", "systolic", "diastolic", "note"]);
        assert!(matches!(
            err.issues()[1],
            EntryIssue::Invalid {
                error: FieldError::RequiredFieldMissing { .. },
                ..
            }
        ));
        assert_eq!(err.issues()[2].code(), "HABIT_TYPE_MISMATCH");
    }

    #[test]
    fn test_reconstruct_round_trip() {
        let tracker = blood_pressure();
        let validator = FieldValidator::new();
        let values = as_map(json!({ "systolic": 118, "diastolic": 76, "note": "after run" }));

        let rows = validate_entry(&tracker, &values, &validator).unwrap();
        let rebuilt = reconstruct_values(&tracker, &rows, &validator).unwrap();

        assert_eq!(rebuilt["systolic"], json!(118.0));
        assert_eq!(rebuilt["note"], json!("after run"));
    }

    #[test]
    fn test_reconstruct_rejects_foreign_column() {
        let tracker = blood_pressure();
        let rows = vec![
            EntryValueRow {
                field_key: "systolic".into(),
                columns: EntryValueColumns {
                    value_num: Some(120.0),
                    ..EntryValueColumns::empty()
                },
            },
            EntryValueRow {
                field_key: "note".into(),
                columns: EntryValueColumns {
                    value_bool: Some(true),
                    ..EntryValueColumns::empty()
                },
            },
        ];

        let err = reconstruct_values(&tracker, &rows, &FieldValidator::new()).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].code(), "HABIT_COLUMN_TYPE_MISMATCH");
    }

    #[test]
    fn test_row_json_shape() {
        let row = EntryValueRow {
            field_key: "focus".into(),
            columns: EntryValueColumns {
                value_duration_sec: Some(600),
                ..EntryValueColumns::empty()
            },
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({
                "field_key": "focus",
                "value_bool": null,
                "value_num": null,
                "value_duration_sec": 600,
                "value_text": null
            })
        );
    }
}
