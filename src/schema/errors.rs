//! Schema error types
//!
//! Error codes:
//! - SETPARITY_SCHEMA_MISMATCH
//! - SETPARITY_UNKNOWN_CODE
//! - SETPARITY_MISSING_VALUE
//! - SETPARITY_INVALID_VALUE
//! - SETPARITY_UNKNOWN_ENGINE
//! - SETPARITY_UNKNOWN_LOGIC
//!
//! All schema errors abort the operation that raised them.

use thiserror::Error;

use super::types::EntityKind;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Field has no entry in the field tables for that entity
    #[error("No {entity} field named '{field}' in the schema")]
    SchemaMismatch { entity: EntityKind, field: String },

    #[error("Unknown {table} label '{label}'")]
    UnknownCode { table: &'static str, label: String },

    #[error("{path}: Missing value for required field '{field}'")]
    MissingValue { path: String, field: String },

    #[error("{path}: Field '{field}' has invalid value {value}")]
    InvalidValue {
        path: String,
        field: String,
        value: String,
    },

    #[error("Unknown engine id '{0}'")]
    UnknownEngine(String),

    #[error("Unknown logic name '{0}'")]
    UnknownLogic(String),
}

impl SchemaError {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::SchemaMismatch { .. } => "SETPARITY_SCHEMA_MISMATCH",
            SchemaError::UnknownCode { .. } => "SETPARITY_UNKNOWN_CODE",
            SchemaError::MissingValue { .. } => "SETPARITY_MISSING_VALUE",
            SchemaError::InvalidValue { .. } => "SETPARITY_INVALID_VALUE",
            SchemaError::UnknownEngine(_) => "SETPARITY_UNKNOWN_ENGINE",
            SchemaError::UnknownLogic(_) => "SETPARITY_UNKNOWN_LOGIC",
        }
    }

    pub fn mismatch(entity: EntityKind, field: impl Into<String>) -> Self {
        SchemaError::SchemaMismatch {
            entity,
            field: field.into(),
        }
    }

    pub fn missing(path: impl Into<String>, field: impl Into<String>) -> Self {
        SchemaError::MissingValue {
            path: path.into(),
            field: field.into(),
        }
    }

    pub fn invalid(path: impl Into<String>, field: impl Into<String>, value: impl ToString) -> Self {
        SchemaError::InvalidValue {
            path: path.into(),
            field: field.into(),
            value: value.to_string(),
        }
    }
}
