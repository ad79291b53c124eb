//! Field value engine
//!
//! Tracker fields are typed by a closed set of primitive types. Candidate
//! values are checked against a field definition and mapped onto a fixed
//! four-column storage layout.
//!
//! # Design Principles
//!
//! - Pure and deterministic: no I/O, no shared mutable state
//! - No coercion: a value is returned exactly as given or rejected
//! - Every violation is a typed [`FieldError`]
//! - One value, one column

mod errors;
mod pattern;
mod types;
mod validator;

pub use errors::{FieldError, FieldResult};
pub use pattern::{CompiledPattern, PatternCache};
pub use types::{
    Candidate, ColumnKey, EntryValueColumns, FieldDefinition, PrimitiveType, PrimitiveValidation,
    PrimitiveValue,
};
pub use validator::{
    parse_primitive_type, to_storage_columns, validate_field_definition,
    validate_storage_columns, validate_value, FieldValidator,
};
