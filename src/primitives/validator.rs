//! Field definition and value validation
//!
//! Validation semantics:
//! - Definitions are re-checked before every value check
//! - null is accepted unless the field is required
//! - Runtime types must match the primitive type exactly, no coercion
//! - Bounds are checked after type checks
//! - A value occupies exactly the storage column owned by its type

use super::errors::{FieldError, FieldResult};
use super::pattern::{CompiledPattern, PatternCache};
use super::types::{
    Candidate, ColumnKey, EntryValueColumns, FieldDefinition, PrimitiveType, PrimitiveValidation,
    PrimitiveValue,
};

/// Validator for field definitions and candidate values.
///
/// Stateless apart from an optional pattern cache. Validation is
/// deterministic and never mutates its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator<'a> {
    patterns: Option<&'a PatternCache>,
}

impl<'a> FieldValidator<'a> {
    /// Creates a validator that compiles patterns on every call.
    pub fn new() -> Self {
        Self { patterns: None }
    }

    /// Creates a validator that reuses compiled patterns from `cache`.
    pub fn with_cache(cache: &'a PatternCache) -> Self {
        Self {
            patterns: Some(cache),
        }
    }

    /// Checks a field definition.
    ///
    /// # Errors
    ///
    /// - `InvalidField` for a blank key or a boolean field with a unit
    /// - `InvalidValidation` for inverted bounds, negative duration bounds
    ///   or a malformed pattern
    pub fn validate_definition(&self, field: &FieldDefinition) -> FieldResult<()> {
        self.check_definition(field).map(|_| ())
    }

    /// Validates a JSON candidate against a field definition.
    pub fn validate_value(
        &self,
        field: &FieldDefinition,
        value: &serde_json::Value,
    ) -> FieldResult<Option<PrimitiveValue>> {
        self.validate_candidate(field, Candidate::from(value))
    }

    /// Validates a raw candidate against a field definition.
    ///
    /// Returns `None` for an accepted null, otherwise the value unchanged.
    pub fn validate_candidate(
        &self,
        field: &FieldDefinition,
        candidate: Candidate<'_>,
    ) -> FieldResult<Option<PrimitiveValue>> {
        let pattern = self.check_definition(field)?;
        let default_validation = PrimitiveValidation::default();
        let validation = field.validation.as_ref().unwrap_or(&default_validation);
        let key = field.field_key.as_str();

        if candidate == Candidate::Null {
            if validation.is_required() {
                return Err(FieldError::RequiredFieldMissing {
                    field_key: key.to_string(),
                });
            }
            return Ok(None);
        }

        let value = match field.primitive_type {
            PrimitiveType::Boolean => match candidate {
                Candidate::Bool(b) => PrimitiveValue::Boolean(b),
                _ => return Err(FieldError::type_mismatch(key, "expects a boolean value")),
            },
            PrimitiveType::Number => {
                let n = finite_number(candidate).ok_or_else(|| {
                    FieldError::type_mismatch(key, "expects a finite numeric value")
                })?;
                if validation.is_integer() && n.fract() != 0.0 {
                    return Err(FieldError::type_mismatch(key, "expects an integer value"));
                }
                check_bounds(key, n, validation)?;
                PrimitiveValue::Number(n)
            }
            PrimitiveType::Duration => {
                let secs = duration_seconds(key, candidate)?;
                if secs < 0 {
                    return Err(FieldError::range(key, "duration cannot be negative"));
                }
                check_bounds(key, secs as f64, validation)?;
                // Must fit the signed storage column
                let secs = i64::try_from(secs).map_err(|_| {
                    FieldError::range(key, "duration exceeds the storable range")
                })?;
                PrimitiveValue::Duration(secs.unsigned_abs())
            }
            PrimitiveType::Text => {
                let text = match candidate {
                    Candidate::Text(s) => s,
                    _ => return Err(FieldError::type_mismatch(key, "expects a string value")),
                };
                let length = text.chars().count();
                if let Some(min_length) = validation.min_length {
                    if length < min_length {
                        return Err(FieldError::range(
                            key,
                            format!("length must be >= {}", min_length),
                        ));
                    }
                }
                if let Some(max_length) = validation.max_length {
                    if length > max_length {
                        return Err(FieldError::range(
                            key,
                            format!("length must be <= {}", max_length),
                        ));
                    }
                }
                if let Some(pattern) = &pattern {
                    if !pattern.is_full_match(text) {
                        return Err(FieldError::PatternMismatch {
                            field_key: key.to_string(),
                        });
                    }
                }
                PrimitiveValue::Text(text.to_string())
            }
        };

        Ok(Some(value))
    }

    /// Maps a candidate to the four storage columns.
    ///
    /// Exactly the column owned by the field's type is set; an accepted null
    /// leaves every column null.
    pub fn to_storage_columns(
        &self,
        field: &FieldDefinition,
        value: &serde_json::Value,
    ) -> FieldResult<EntryValueColumns> {
        let validated = self.validate_value(field, value)?;
        let mut columns = EntryValueColumns::empty();

        match validated {
            None => {}
            Some(PrimitiveValue::Boolean(b)) => columns.value_bool = Some(b),
            Some(PrimitiveValue::Number(n)) => columns.value_num = Some(n),
            Some(PrimitiveValue::Duration(secs)) => {
                let secs = i64::try_from(secs).map_err(|_| {
                    FieldError::range(&field.field_key, "duration exceeds the storable range")
                })?;
                columns.value_duration_sec = Some(secs);
            }
            Some(PrimitiveValue::Text(s)) => columns.value_text = Some(s),
        }

        Ok(columns)
    }

    /// Checks stored columns against a field definition (read / write-back path).
    ///
    /// Any non-null column not owned by the field's type is rejected before
    /// the owned column's content is re-validated. Returns the stored value.
    pub fn validate_storage_columns(
        &self,
        field: &FieldDefinition,
        columns: &EntryValueColumns,
    ) -> FieldResult<Option<PrimitiveValue>> {
        let owned = field.primitive_type.column();

        for column in ColumnKey::ALL {
            if column != owned && !columns.is_null(column) {
                return Err(FieldError::ColumnTypeMismatch {
                    field_key: field.field_key.clone(),
                    primitive_type: field.primitive_type,
                    column,
                });
            }
        }

        self.validate_candidate(field, columns.candidate(owned))
    }

    /// Definition checks; returns the compiled pattern for text fields.
    fn check_definition(&self, field: &FieldDefinition) -> FieldResult<Option<CompiledPattern>> {
        if field.field_key.trim().is_empty() {
            return Err(FieldError::InvalidField("fieldKey is required.".into()));
        }

        if field.primitive_type == PrimitiveType::Boolean
            && field.unit.as_deref().map_or(false, |u| !u.is_empty())
        {
            return Err(FieldError::InvalidField(
                "Boolean fields cannot define a unit.".into(),
            ));
        }

        let validation = match &field.validation {
            Some(v) => v,
            None => return Ok(None),
        };

        match field.primitive_type {
            PrimitiveType::Number | PrimitiveType::Duration => {
                if let (Some(min), Some(max)) = (validation.min, validation.max) {
                    if min > max {
                        return Err(FieldError::InvalidValidation(
                            "validation.min cannot be greater than validation.max.".into(),
                        ));
                    }
                }

                if field.primitive_type == PrimitiveType::Duration {
                    if validation.min.unwrap_or(0.0) < 0.0 {
                        return Err(FieldError::InvalidValidation(
                            "Duration validation.min cannot be negative.".into(),
                        ));
                    }
                    if validation.max.map_or(false, |max| max < 0.0) {
                        return Err(FieldError::InvalidValidation(
                            "Duration validation.max cannot be negative.".into(),
                        ));
                    }
                }

                Ok(None)
            }
            PrimitiveType::Text => {
                if let (Some(min_length), Some(max_length)) =
                    (validation.min_length, validation.max_length)
                {
                    if min_length > max_length {
                        return Err(FieldError::InvalidValidation(
                            "validation.minLength cannot be greater than validation.maxLength."
                                .into(),
                        ));
                    }
                }

                validation
                    .pattern
                    .as_deref()
                    .map(|source| self.compile(source))
                    .transpose()
            }
            PrimitiveType::Boolean => Ok(None),
        }
    }

    fn compile(&self, source: &str) -> FieldResult<CompiledPattern> {
        let compiled = match self.patterns {
            Some(cache) => cache.get_or_compile(source),
            None => CompiledPattern::compile(source),
        };
        compiled.map_err(|e| {
            FieldError::InvalidValidation(format!(
                "validation.pattern is not a valid regular expression: {}",
                e
            ))
        })
    }
}

/// Parses a primitive type token (case-sensitive).
pub fn parse_primitive_type(raw: &str) -> FieldResult<PrimitiveType> {
    raw.parse()
}

/// Checks a field definition without a pattern cache.
pub fn validate_field_definition(field: &FieldDefinition) -> FieldResult<()> {
    FieldValidator::new().validate_definition(field)
}

/// Validates a JSON candidate value without a pattern cache.
pub fn validate_value(
    field: &FieldDefinition,
    value: &serde_json::Value,
) -> FieldResult<Option<PrimitiveValue>> {
    FieldValidator::new().validate_value(field, value)
}

/// Maps a JSON candidate value to storage columns without a pattern cache.
pub fn to_storage_columns(
    field: &FieldDefinition,
    value: &serde_json::Value,
) -> FieldResult<EntryValueColumns> {
    FieldValidator::new().to_storage_columns(field, value)
}

/// Checks stored columns without a pattern cache.
pub fn validate_storage_columns(
    field: &FieldDefinition,
    columns: &EntryValueColumns,
) -> FieldResult<Option<PrimitiveValue>> {
    FieldValidator::new().validate_storage_columns(field, columns)
}

/// Booleans are not numbers; only integers and finite floats pass.
fn finite_number(candidate: Candidate<'_>) -> Option<f64> {
    match candidate {
        Candidate::Integer(i) => Some(i as f64),
        Candidate::Number(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

/// Whole seconds, exact for integer input. Sign is checked by the caller.
fn duration_seconds(field_key: &str, candidate: Candidate<'_>) -> FieldResult<i128> {
    match candidate {
        Candidate::Integer(i) => Ok(i),
        Candidate::Number(n) if n.is_finite() => {
            if n.fract() != 0.0 {
                return Err(FieldError::type_mismatch(
                    field_key,
                    "duration must be an integer number of seconds",
                ));
            }
            // Saturates far outside the storable range
            Ok(n as i128)
        }
        _ => Err(FieldError::type_mismatch(
            field_key,
            "expects a finite duration value in seconds",
        )),
    }
}

fn check_bounds(field_key: &str, n: f64, validation: &PrimitiveValidation) -> FieldResult<()> {
    if let Some(min) = validation.min {
        if n < min {
            return Err(FieldError::range(field_key, format!("must be >= {}", min)));
        }
    }
    if let Some(max) = validation.max {
        if n > max {
            return Err(FieldError::range(field_key, format!("must be <= {}", max)));
        }
    }
    Ok(())
}
