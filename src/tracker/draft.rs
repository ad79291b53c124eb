//! Tracker drafts and their normalized form
//!
//! A draft is what a client submits. Normalization trims names, parses
//! primitive types, validates every field definition and the schedule, and
//! rejects duplicate field keys. The result serializes to the stored record
//! shape (schedule and validation as JSON text).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::primitives::{
    FieldDefinition, FieldResult, FieldValidator, PrimitiveType, PrimitiveValidation,
};
use crate::schedule::{normalize_schedule, ScheduleConfig};

use super::errors::{TrackerError, TrackerResult};

/// Default cap on fields per tracker
pub const DEFAULT_MAX_FIELDS: usize = 32;

/// Limits applied during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerLimits {
    pub max_fields: usize,
}

impl Default for TrackerLimits {
    fn default() -> Self {
        Self {
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

/// A field as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    #[serde(default)]
    pub field_key: String,
    pub primitive_type: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub validation: Option<PrimitiveValidation>,
    /// Opaque goal data, e.g. `{"dailyTarget": 80}`
    #[serde(default)]
    pub target: Option<Map<String, Value>>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl FieldDraft {
    pub fn new(field_key: impl Into<String>, primitive_type: impl Into<String>) -> Self {
        Self {
            field_key: field_key.into(),
            primitive_type: primitive_type.into(),
            unit: None,
            validation: None,
            target: None,
            sort_order: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_validation(mut self, validation: PrimitiveValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_target(mut self, target: Map<String, Value>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Parses the type token and trims key and unit. The definition itself
    /// is not validated here.
    pub fn to_definition(&self) -> FieldResult<FieldDefinition> {
        Ok(FieldDefinition {
            field_key: self.field_key.trim().to_string(),
            primitive_type: self.primitive_type.parse::<PrimitiveType>()?,
            unit: trimmed_or_none(self.unit.as_deref()),
            validation: self.validation.clone(),
        })
    }
}

/// A tracker as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub fields: Vec<FieldDraft>,
}

/// A validated field with its ordering and goal data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerField {
    #[serde(flatten)]
    pub definition: FieldDefinition,
    pub target: Option<Map<String, Value>>,
    pub sort_order: i64,
}

/// A normalized tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerDefinition {
    pub name: String,
    pub description: Option<String>,
    pub schedule: ScheduleConfig,
    /// Ordered by `sort_order`, ties in submission order
    pub fields: Vec<TrackerField>,
}

impl TrackerDefinition {
    pub fn field(&self, field_key: &str) -> Option<&TrackerField> {
        self.fields
            .iter()
            .find(|f| f.definition.field_key == field_key)
    }

    /// Serialized form for storage
    pub fn to_record(&self) -> TrackerResult<TrackerRecord> {
        let schedule_config_json = serde_json::to_string(&self.schedule)
            .map_err(|e| TrackerError::MalformedRecord(e.to_string()))?;

        let fields = self
            .fields
            .iter()
            .map(|field| -> TrackerResult<TrackerFieldRecord> {
                Ok(TrackerFieldRecord {
                    field_key: field.definition.field_key.clone(),
                    primitive_type: field.definition.primitive_type.as_str().to_string(),
                    unit: field.definition.unit.clone(),
                    validation_json: to_json_text(field.definition.validation.as_ref())?,
                    target_json: to_json_text(field.target.as_ref())?,
                    sort_order: field.sort_order,
                })
            })
            .collect::<TrackerResult<Vec<_>>>()?;

        Ok(TrackerRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            schedule_config_json,
            fields,
        })
    }

    /// Rebuilds a tracker from its stored form, re-checking every part.
    pub fn from_record(
        record: &TrackerRecord,
        validator: &FieldValidator<'_>,
    ) -> TrackerResult<Self> {
        let schedule: ScheduleConfig = serde_json::from_str(&record.schedule_config_json)
            .map_err(|e| TrackerError::MalformedRecord(format!("schedule_config_json: {}", e)))?;
        let schedule = normalize_schedule(&schedule)?;

        let mut seen_keys = HashSet::with_capacity(record.fields.len());
        let mut fields = record
            .fields
            .iter()
            .map(|stored| -> TrackerResult<TrackerField> {
                let definition = FieldDefinition {
                    field_key: stored.field_key.clone(),
                    primitive_type: stored.primitive_type.parse::<PrimitiveType>()?,
                    unit: stored.unit.clone(),
                    validation: from_json_text(
                        stored.validation_json.as_deref(),
                        "validation_json",
                    )?,
                };
                validator.validate_definition(&definition)?;
                claim_key(&mut seen_keys, &definition.field_key)?;

                Ok(TrackerField {
                    definition,
                    target: from_json_text(stored.target_json.as_deref(), "target_json")?,
                    sort_order: stored.sort_order,
                })
            })
            .collect::<TrackerResult<Vec<_>>>()?;
        fields.sort_by_key(|f| f.sort_order);

        Ok(Self {
            name: record.name.clone(),
            description: record.description.clone(),
            schedule,
            fields,
        })
    }
}

/// Stored field row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerFieldRecord {
    pub field_key: String,
    pub primitive_type: String,
    pub unit: Option<String>,
    pub validation_json: Option<String>,
    pub target_json: Option<String>,
    pub sort_order: i64,
}

/// Stored tracker row with its field rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerRecord {
    pub name: String,
    pub description: Option<String>,
    pub schedule_config_json: String,
    pub fields: Vec<TrackerFieldRecord>,
}

/// Normalizes a tracker draft.
///
/// # Errors
///
/// The first problem found, checked in order: name, field count, schedule,
/// then each field (type token, definition, duplicate key).
pub fn normalize_tracker(
    draft: &TrackerDraft,
    limits: &TrackerLimits,
    validator: &FieldValidator<'_>,
) -> TrackerResult<TrackerDefinition> {
    let result = normalize_inner(draft, limits, validator);

    match &result {
        Ok(tracker) => {
            let field_count = tracker.fields.len().to_string();
            log_event_with_fields(
                Event::TrackerNormalized,
                &[("name", tracker.name.as_str()), ("fields", field_count.as_str())],
            );
        }
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(
                Event::TrackerRejected,
                &[("code", e.code()), ("message", message.as_str())],
            );
        }
    }

    result
}

fn normalize_inner(
    draft: &TrackerDraft,
    limits: &TrackerLimits,
    validator: &FieldValidator<'_>,
) -> TrackerResult<TrackerDefinition> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(TrackerError::NameRequired);
    }

    if draft.fields.is_empty() {
        return Err(TrackerError::FieldsRequired);
    }
    if draft.fields.len() > limits.max_fields {
        return Err(TrackerError::TooManyFields {
            max: limits.max_fields,
        });
    }

    let schedule = normalize_schedule(&draft.schedule)?;

    let mut seen_keys = HashSet::with_capacity(draft.fields.len());
    let mut fields = Vec::with_capacity(draft.fields.len());

    for (index, field) in draft.fields.iter().enumerate() {
        let definition = field.to_definition()?;
        validator.validate_definition(&definition)?;

        claim_key(&mut seen_keys, &definition.field_key)?;

        fields.push(TrackerField {
            definition,
            target: field.target.clone(),
            sort_order: field.sort_order.unwrap_or(index as i64),
        });
    }

    // Stable: equal sort orders keep submission order
    fields.sort_by_key(|f| f.sort_order);

    Ok(TrackerDefinition {
        name: name.to_string(),
        description: trimmed_or_none(draft.description.as_deref()),
        schedule,
        fields,
    })
}

fn claim_key(seen_keys: &mut HashSet<String>, field_key: &str) -> TrackerResult<()> {
    if !seen_keys.insert(field_key.to_string()) {
        return Err(TrackerError::DuplicateFieldKey(field_key.to_string()));
    }
    Ok(())
}

fn trimmed_or_none(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn to_json_text<T: Serialize>(value: Option<&T>) -> TrackerResult<Option<String>> {
    value
        .map(|v| serde_json::to_string(v).map_err(|e| TrackerError::MalformedRecord(e.to_string())))
        .transpose()
}

fn from_json_text<T: serde::de::DeserializeOwned>(
    text: Option<&str>,
    column: &str,
) -> TrackerResult<Option<T>> {
    text.map(|t| {
        serde_json::from_str(t)
            .map_err(|e| TrackerError::MalformedRecord(format!("{}: {}", column, e)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::FieldError;
    use crate::schedule::ScheduleError;
    use serde_json::json;

    fn draft(fields: Vec<FieldDraft>) -> TrackerDraft {
        TrackerDraft {
            name: "  Water Intake ".into(),
            description: Some("   ".into()),
            schedule: ScheduleConfig::daily(["18:00", "09:00"]),
            fields,
        }
    }

    fn normalize(draft: &TrackerDraft) -> TrackerResult<TrackerDefinition> {
        normalize_tracker(draft, &TrackerLimits::default(), &FieldValidator::new())
    }

    #[test]
    fn test_normalizes_names_units_and_schedule() {
        let tracker = normalize(&draft(vec![
            FieldDraft::new(" ounces ", "number").with_unit("  oz "),
            FieldDraft::new("note", "text").with_unit("   "),
        ]))
        .unwrap();

        assert_eq!(tracker.name, "Water Intake");
        assert_eq!(tracker.description, None);
        assert_eq!(tracker.schedule, ScheduleConfig::daily(["09:00", "18:00"]));
        assert_eq!(tracker.fields[0].definition.field_key, "ounces");
        assert_eq!(tracker.fields[0].definition.unit.as_deref(), Some("oz"));
        assert_eq!(tracker.fields[1].definition.unit, None);
    }

    #[test]
    fn test_sort_order_defaults_to_index() {
        let tracker = normalize(&draft(vec![
            FieldDraft::new("a", "number"),
            FieldDraft::new("b", "number").with_sort_order(-1),
            FieldDraft::new("c", "number"),
        ]))
        .unwrap();

        let keys: Vec<_> = tracker
            .fields
            .iter()
            .map(|f| (f.definition.field_key.as_str(), f.sort_order))
            .collect();
        assert_eq!(keys, vec![("b", -1), ("a", 0), ("c", 2)]);
    }

    #[test]
    fn test_name_required() {
        let mut d = draft(vec![FieldDraft::new("a", "number")]);
        d.name = "   ".into();
        assert_eq!(normalize(&d), Err(TrackerError::NameRequired));
    }

    #[test]
    fn test_fields_required() {
        assert_eq!(normalize(&draft(vec![])), Err(TrackerError::FieldsRequired));
    }

    #[test]
    fn test_field_limit() {
        let fields = (0..3).map(|i| FieldDraft::new(format!("f{}", i), "number")).collect();
        let result = normalize_tracker(
            &draft(fields),
            &TrackerLimits { max_fields: 2 },
            &FieldValidator::new(),
        );
        assert_eq!(result, Err(TrackerError::TooManyFields { max: 2 }));
    }

    #[test]
    fn test_schedule_errors_surface() {
        let mut d = draft(vec![FieldDraft::new("a", "number")]);
        d.schedule = ScheduleConfig::daily(["08:00", "08:00"]);
        assert_eq!(
            normalize(&d),
            Err(TrackerError::Schedule(ScheduleError::DuplicateScheduleTime))
        );
    }

    #[test]
    fn test_unknown_primitive_type() {
        let result = normalize(&draft(vec![FieldDraft::new("a", "json")]));
        assert_eq!(
            result,
            Err(TrackerError::Field(FieldError::UnsupportedPrimitiveType("json".into())))
        );
    }

    #[test]
    fn test_duplicate_keys_after_trim() {
        let result = normalize(&draft(vec![
            FieldDraft::new("score", "number"),
            FieldDraft::new(" score", "number"),
        ]));
        assert_eq!(result, Err(TrackerError::DuplicateFieldKey("score".into())));
        assert_eq!(
            TrackerError::DuplicateFieldKey("score".into()).to_string(),
            "Duplicate fieldKey: score"
        );
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let result = normalize(&draft(vec![
            FieldDraft::new("done", "boolean").with_unit("times")
        ]));
        assert!(matches!(
            result,
            Err(TrackerError::Field(FieldError::InvalidField(_)))
        ));
    }

    #[test]
    fn test_draft_from_json() {
        let d: TrackerDraft = serde_json::from_value(json!({
            "name": "Meditation",
            "schedule": { "kind": "weekdays", "times": ["07:30"] },
            "fields": [{
                "fieldKey": "minutes",
                "primitiveType": "duration",
                "unit": "sec",
                "validation": { "min": 60, "max": 7200 },
                "target": { "dailyTargetSec": 600 }
            }]
        }))
        .unwrap();

        let tracker = normalize(&d).unwrap();
        assert_eq!(
            tracker.fields[0].definition.primitive_type,
            PrimitiveType::Duration
        );
        assert_eq!(
            tracker.fields[0].target.as_ref().unwrap()["dailyTargetSec"],
            json!(600)
        );
    }

    #[test]
    fn test_record_round_trip() {
        let tracker = normalize(&draft(vec![
            FieldDraft::new("ounces", "number")
                .with_validation(PrimitiveValidation::range(Some(0.0), Some(256.0))),
            FieldDraft::new("done", "boolean"),
        ]))
        .unwrap();

        let record = tracker.to_record().unwrap();
        assert_eq!(record.schedule_config_json, r#"{"kind":"daily","times":["09:00","18:00"]}"#);
        assert_eq!(record.fields[1].validation_json, None);

        let rebuilt = TrackerDefinition::from_record(&record, &FieldValidator::new()).unwrap();
        assert_eq!(rebuilt, tracker);
    }

    #[test]
    fn test_malformed_record_rejected() {
        let record = TrackerRecord {
            name: "x".into(),
            description: None,
            schedule_config_json: "{not json".into(),
            fields: vec![],
        };
        assert!(matches!(
            TrackerDefinition::from_record(&record, &FieldValidator::new()),
            Err(TrackerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_record_with_duplicate_keys_rejected() {
        let tracker = normalize(&draft(vec![
            FieldDraft::new("ounces", "number"),
            FieldDraft::new("done", "boolean"),
        ]))
        .unwrap();

        let mut record = tracker.to_record().unwrap();
        record.fields[1].field_key = "ounces".into();
        record.fields[1].primitive_type = "number".into();

        assert_eq!(
            TrackerDefinition::from_record(&record, &FieldValidator::new()),
            Err(TrackerError::DuplicateFieldKey("ounces".into()))
        );
    }
}
