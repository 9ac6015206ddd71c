//! Observable events
//!
//! Every log line emitted by the codec and validators carries one of
//! these as its `event` field. Names are stable and uppercase.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Inputs
    /// Generator config loaded and validated
    ConfigLoaded,
    /// Hierarchical document parsed
    DocumentLoaded,
    /// Setfile bytes decoded into a key map
    SetfileDecoded,
    /// Setfile repeats one or more keys
    DuplicateKeys,

    // Codec
    /// Document encoded into flat entries
    DocumentEncoded,
    /// Two engines disagree on a shared group-level key
    GroupKeyConflict,
    /// Setfile imported into a document
    SetfileImported,

    // Outputs
    /// Setfile written atomically
    SetfileWritten,
    /// Document written
    DocumentWritten,

    // Validation
    /// All checks passed
    ValidationPassed,
    /// One or more errors found
    ValidationFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DocumentLoaded => "DOCUMENT_LOADED",
            Event::SetfileDecoded => "SETFILE_DECODED",
            Event::DuplicateKeys => "DUPLICATE_KEYS",

            Event::DocumentEncoded => "DOCUMENT_ENCODED",
            Event::GroupKeyConflict => "GROUP_KEY_CONFLICT",
            Event::SetfileImported => "SETFILE_IMPORTED",

            Event::SetfileWritten => "SETFILE_WRITTEN",
            Event::DocumentWritten => "DOCUMENT_WRITTEN",

            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
        }
    }

    /// Events logged at WARN rather than INFO
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::DuplicateKeys | Event::GroupKeyConflict | Event::ValidationFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
