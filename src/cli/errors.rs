//! CLI-specific error types
//!
//! All CLI errors are fatal and exit with status 1. Subsystem errors keep
//! their own code alongside the CLI code.

use std::fmt;
use std::io;

use crate::model::ModelError;
use crate::schema::SchemaError;
use crate::setfile::SetfileError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Generator config unreadable or invalid
    ConfigError,
    /// Document unreadable or malformed
    DocumentError,
    /// Setfile unreadable, undecodable or unwritable
    SetfileError,
    /// Encoding or import rejected by the schema
    SchemaError,
    /// I/O error (stdout or output files)
    IoError,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SETPARITY_CLI_CONFIG_ERROR",
            Self::DocumentError => "SETPARITY_CLI_DOCUMENT_ERROR",
            Self::SetfileError => "SETPARITY_CLI_SETFILE_ERROR",
            Self::SchemaError => "SETPARITY_CLI_SCHEMA_ERROR",
            Self::IoError => "SETPARITY_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    /// Code of the subsystem error this wraps
    cause: Option<&'static str>,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            cause: None,
            message: message.into(),
        }
    }

    fn caused_by(mut self, cause: &'static str) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn document_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DocumentError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Subsystem code, e.g. `SETPARITY_UNKNOWN_CODE`
    pub fn cause(&self) -> Option<&'static str> {
        self.cause
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause {
            Some(cause) => write!(f, "{}: [{}] {}", self.code.code(), cause, self.message),
            None => write!(f, "{}: {}", self.code.code(), self.message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        Self::config_error(e.to_string()).caused_by(e.code())
    }
}

impl From<SetfileError> for CliError {
    fn from(e: SetfileError) -> Self {
        Self::new(CliErrorCode::SetfileError, e.to_string()).caused_by(e.code())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::SchemaError, e.to_string()).caused_by(e.code())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
