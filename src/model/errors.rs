//! Model and configuration errors

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Io { .. } => "SETPARITY_IO_ERROR",
            ModelError::Parse { .. } => "SETPARITY_CONFIG_PARSE",
            ModelError::InvalidConfig(_) => "SETPARITY_CONFIG_INVALID",
            ModelError::Schema(e) => e.code(),
        }
    }
}
