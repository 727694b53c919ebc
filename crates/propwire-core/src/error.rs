//! Errors raised by the dynamic (name-based) record path.
//!
//! The typed path cannot fail: a [`Field`](crate::Field) key only exists for
//! declared fields and carries the field's type.

use crate::value::ValueKind;

/// Errors from name-based record access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record declares no field with this name.
    InvalidField {
        /// Record type name.
        record: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
    /// The value's kind does not match the field's declared type.
    TypeMismatch {
        /// Field name.
        field: &'static str,
        /// Kind the field accepts.
        expected: ValueKind,
        /// Kind that was supplied.
        found: ValueKind,
    },
}

impl RecordError {
    /// Build an [`InvalidField`](Self::InvalidField) error.
    #[must_use]
    pub fn invalid_field(record: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidField {
            record,
            name: name.into(),
        }
    }

    /// Build a [`TypeMismatch`](Self::TypeMismatch) error.
    #[must_use]
    pub fn type_mismatch(field: &'static str, expected: ValueKind, found: ValueKind) -> Self {
        Self::TypeMismatch {
            field,
            expected,
            found,
        }
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField { record, name } => {
                write!(f, "invalid field '{name}' on record {record}")
            }
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' expects {expected}, got {found}"),
        }
    }
}

impl std::error::Error for RecordError {}
