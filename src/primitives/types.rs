//! Field definition and value types
//!
//! Supported primitive types:
//! - boolean: true/false
//! - number: finite 64-bit float
//! - duration: non-negative integer count of seconds
//! - text: UTF-8 string

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::FieldError;

/// Closed set of value kinds a tracker field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Number,
    Duration,
    Text,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 4] = [
        PrimitiveType::Boolean,
        PrimitiveType::Number,
        PrimitiveType::Duration,
        PrimitiveType::Text,
    ];

    /// Returns the type token
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Number => "number",
            PrimitiveType::Duration => "duration",
            PrimitiveType::Text => "text",
        }
    }

    /// The storage column owned by this type
    pub fn column(&self) -> ColumnKey {
        match self {
            PrimitiveType::Boolean => ColumnKey::ValueBool,
            PrimitiveType::Number => ColumnKey::ValueNum,
            PrimitiveType::Duration => ColumnKey::ValueDurationSec,
            PrimitiveType::Text => ColumnKey::ValueText,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveType {
    type Err = FieldError;

    /// Case-sensitive: only the four exact tokens are accepted.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        PrimitiveType::ALL
            .into_iter()
            .find(|t| t.as_str() == raw)
            .ok_or_else(|| FieldError::UnsupportedPrimitiveType(raw.to_string()))
    }
}

/// Optional constraint bag. Which keys matter depends on the primitive type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl PrimitiveValidation {
    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }

    pub fn is_integer(&self) -> bool {
        self.integer == Some(true)
    }

    pub fn required() -> Self {
        Self {
            required: Some(true),
            ..Default::default()
        }
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Default::default()
        }
    }

    pub fn length(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self {
            min_length,
            max_length,
            ..Default::default()
        }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Default::default()
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_integer(mut self, integer: bool) -> Self {
        self.integer = Some(integer);
        self
    }
}

/// Schema for one loggable attribute of a tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub field_key: String,
    pub primitive_type: PrimitiveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<PrimitiveValidation>,
}

impl FieldDefinition {
    pub fn new(field_key: impl Into<String>, primitive_type: PrimitiveType) -> Self {
        Self {
            field_key: field_key.into(),
            primitive_type,
            unit: None,
            validation: None,
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

    pub fn is_required(&self) -> bool {
        self.validation
            .as_ref()
            .map(PrimitiveValidation::is_required)
            .unwrap_or(false)
    }
}

/// A validated field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimitiveValue {
    Boolean(bool),
    Number(f64),
    /// Seconds
    Duration(u64),
    Text(String),
}

impl PrimitiveValue {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveType::Boolean,
            PrimitiveValue::Number(_) => PrimitiveType::Number,
            PrimitiveValue::Duration(_) => PrimitiveType::Duration,
            PrimitiveValue::Text(_) => PrimitiveType::Text,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PrimitiveValue::Boolean(b) => Value::Bool(*b),
            PrimitiveValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PrimitiveValue::Duration(secs) => Value::from(*secs),
            PrimitiveValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(value: PrimitiveValue) -> Self {
        value.to_json()
    }
}

/// A raw candidate value at the boundary, before any type check.
///
/// Integral JSON numbers stay exact in `Integer`; everything else is carried
/// as `f64` so non-finite input can be represented and rejected. JSON itself
/// has no NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate<'a> {
    Null,
    Bool(bool),
    /// Covers the whole `i64` and `u64` ranges
    Integer(i128),
    Number(f64),
    Text(&'a str),
    /// Arrays and objects; carries the shape name for messages
    Other(&'static str),
}

impl<'a> From<&'a Value> for Candidate<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Candidate::Null,
            Value::Bool(b) => Candidate::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
                .map(Candidate::Integer)
                .or_else(|| n.as_f64().map(Candidate::Number))
                .unwrap_or(Candidate::Other("number")),
            Value::String(s) => Candidate::Text(s),
            Value::Array(_) => Candidate::Other("array"),
            Value::Object(_) => Candidate::Other("object"),
        }
    }
}

impl<'a> From<&'a PrimitiveValue> for Candidate<'a> {
    fn from(value: &'a PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::Boolean(b) => Candidate::Bool(*b),
            PrimitiveValue::Number(n) => Candidate::Number(*n),
            PrimitiveValue::Duration(secs) => Candidate::Integer(i128::from(*secs)),
            PrimitiveValue::Text(s) => Candidate::Text(s),
        }
    }
}

impl<'a> From<Option<&'a PrimitiveValue>> for Candidate<'a> {
    fn from(value: Option<&'a PrimitiveValue>) -> Self {
        value.map(Candidate::from).unwrap_or(Candidate::Null)
    }
}

/// Physical column names of the entry value table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    ValueBool,
    ValueNum,
    ValueDurationSec,
    ValueText,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 4] = [
        ColumnKey::ValueBool,
        ColumnKey::ValueNum,
        ColumnKey::ValueDurationSec,
        ColumnKey::ValueText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKey::ValueBool => "value_bool",
            ColumnKey::ValueNum => "value_num",
            ColumnKey::ValueDurationSec => "value_duration_sec",
            ColumnKey::ValueText => "value_text",
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four nullable physical columns holding at most one typed value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryValueColumns {
    #[serde(default)]
    pub value_bool: Option<bool>,
    #[serde(default)]
    pub value_num: Option<f64>,
    #[serde(default)]
    pub value_duration_sec: Option<i64>,
    #[serde(default)]
    pub value_text: Option<String>,
}

impl EntryValueColumns {
    /// All columns null
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_null(&self, column: ColumnKey) -> bool {
        match column {
            ColumnKey::ValueBool => self.value_bool.is_none(),
            ColumnKey::ValueNum => self.value_num.is_none(),
            ColumnKey::ValueDurationSec => self.value_duration_sec.is_none(),
            ColumnKey::ValueText => self.value_text.is_none(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ColumnKey::ALL.iter().all(|c| self.is_null(*c))
    }

    /// The raw content of one column, as it would be read back from storage
    pub fn candidate(&self, column: ColumnKey) -> Candidate<'_> {
        match column {
            ColumnKey::ValueBool => self.value_bool.map(Candidate::Bool),
            ColumnKey::ValueNum => self.value_num.map(Candidate::Number),
            ColumnKey::ValueDurationSec => {
                self.value_duration_sec.map(|s| Candidate::Integer(i128::from(s)))
            }
            ColumnKey::ValueText => self.value_text.as_deref().map(Candidate::Text),
        }
        .unwrap_or(Candidate::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_type_tokens() {
        for t in PrimitiveType::ALL {
            assert_eq!(t.as_str().parse::<PrimitiveType>().unwrap(), t);
        }
        assert!("Boolean".parse::<PrimitiveType>().is_err());
    }

    #[test]
    fn test_column_mapping() {
        assert_eq!(PrimitiveType::Boolean.column(), ColumnKey::ValueBool);
        assert_eq!(PrimitiveType::Number.column(), ColumnKey::ValueNum);
        assert_eq!(PrimitiveType::Duration.column(), ColumnKey::ValueDurationSec);
        assert_eq!(PrimitiveType::Text.column(), ColumnKey::ValueText);
    }

    #[test]
    fn test_field_definition_json_shape() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "fieldKey": "systolic",
            "primitiveType": "number",
            "unit": "mmHg",
            "validation": { "min": 70, "max": 260, "integer": true }
        }))
        .unwrap();

        assert_eq!(field.primitive_type, PrimitiveType::Number);
        let validation = field.validation.as_ref().unwrap();
        assert_eq!(validation.min, Some(70.0));
        assert!(validation.is_integer());
        assert!(!validation.is_required());

        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["validation"], json!({ "min": 70.0, "max": 260.0, "integer": true }));
    }

    #[test]
    fn test_candidate_from_json() {
        assert_eq!(Candidate::from(&json!(null)), Candidate::Null);
        assert_eq!(Candidate::from(&json!(3)), Candidate::Integer(3));
        assert_eq!(Candidate::from(&json!(-3)), Candidate::Integer(-3));
        assert_eq!(Candidate::from(&json!(2.5)), Candidate::Number(2.5));
        assert_eq!(
            Candidate::from(&json!(u64::MAX)),
            Candidate::Integer(i128::from(u64::MAX))
        );
        assert_eq!(Candidate::from(&json!("x")), Candidate::Text("x"));
        assert_eq!(Candidate::from(&json!([1])), Candidate::Other("array"));
    }

    #[test]
    fn test_columns_serialize_with_physical_names() {
        let columns = EntryValueColumns {
            value_duration_sec: Some(90),
            ..EntryValueColumns::empty()
        };
        assert_eq!(
            serde_json::to_value(&columns).unwrap(),
            json!({
                "value_bool": null,
                "value_num": null,
                "value_duration_sec": 90,
                "value_text": null
            })
        );
        assert!(!columns.is_empty());
        assert!(EntryValueColumns::empty().is_empty());
    }
}
