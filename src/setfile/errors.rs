//! # Setfile Errors

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for setfile operations
pub type SetfileResult<T> = Result<T, SetfileError>;

/// Setfile errors. All abort the current operation.
#[derive(Debug, Error)]
pub enum SetfileError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Undecodable setfile: {0}")]
    Decode(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl SetfileError {
    pub fn io_at_path(path: &Path, source: io::Error) -> Self {
        SetfileError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SetfileError::Io { .. } => "SETPARITY_IO_ERROR",
            SetfileError::Decode(_) => "SETPARITY_DECODE_ERROR",
            SetfileError::Schema(e) => e.code(),
        }
    }
}
