//! Enumeration-to-code tables
//!
//! The setfile stores enumerations as integers. Each table maps a
//! document label to its code; the first entry for a code is the label
//! the importer restores.

use super::errors::{SchemaError, SchemaResult};

const TRAIL_METHOD: &[(&str, i64)] = &[
    ("Points", 0),
    ("Percent", 1),
    ("AVG_Points", 2),
    ("AVG_Percent", 3),
];

const TRAIL_STEP_METHOD: &[(&str, i64)] = &[
    ("Step_Points", 0),
    ("Step_Percent", 1),
    ("Step_Pips", 2),
];

const TRAIL_STEP_MODE: &[(&str, i64)] = &[
    ("TrailStepMode_Auto", 0),
    ("TrailStepMode_Fixed", 1),
    ("TrailStepMode_PerOrder", 3),
    ("TrailStepMode_Disabled", 4),
];

const TPSL_MODE: &[(&str, i64)] = &[
    ("TPSL_Points", 0),
    ("TPSL_Price", 1),
    ("TPSL_Percent", 2),
];

const PARTIAL_MODE: &[(&str, i64)] = &[
    ("PartialMode_Low", 0),
    ("PartialMode_Balanced", 1),
    ("PartialMode_High", 2),
];

const PARTIAL_BALANCE: &[(&str, i64)] = &[
    ("PartialBalance_Aggressive", 0),
    ("PartialBalance_Balanced", 1),
    ("PartialBalance_Conservative", 2),
];

const TRIGGER_TYPE: &[(&str, i64)] = &[
    ("Trigger_Immediate", 0),
    ("Trigger_AfterBars", 1),
    ("Trigger_AfterSeconds", 2),
    ("Trigger_AfterPips", 3),
    ("Trigger_TimeFilter", 4),
    ("Trigger_NewsFilter", 5),
    // alias
    ("Default", 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeTable {
    TrailMethod,
    TrailStepMethod,
    TrailStepMode,
    TpslMode,
    PartialMode,
    PartialBalance,
    TriggerType,
}

impl CodeTable {
    pub fn name(&self) -> &'static str {
        match self {
            CodeTable::TrailMethod => "TrailMethod",
            CodeTable::TrailStepMethod => "TrailStepMethod",
            CodeTable::TrailStepMode => "TrailStepMode",
            CodeTable::TpslMode => "TPSLMode",
            CodeTable::PartialMode => "PartialMode",
            CodeTable::PartialBalance => "PartialBalance",
            CodeTable::TriggerType => "TriggerType",
        }
    }

    pub fn entries(&self) -> &'static [(&'static str, i64)] {
        match self {
            CodeTable::TrailMethod => TRAIL_METHOD,
            CodeTable::TrailStepMethod => TRAIL_STEP_METHOD,
            CodeTable::TrailStepMode => TRAIL_STEP_MODE,
            CodeTable::TpslMode => TPSL_MODE,
            CodeTable::PartialMode => PARTIAL_MODE,
            CodeTable::PartialBalance => PARTIAL_BALANCE,
            CodeTable::TriggerType => TRIGGER_TYPE,
        }
    }

    /// Maps a label to its code. A label that is already an integer
    /// passes through unchanged.
    pub fn encode(&self, label: &str) -> SchemaResult<i64> {
        let label = label.trim();
        if let Ok(code) = label.parse::<i64>() {
            return Ok(code);
        }
        self.entries()
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, code)| *code)
            .ok_or_else(|| SchemaError::UnknownCode {
                table: self.name(),
                label: label.to_string(),
            })
    }

    /// Maps a code back to its canonical label
    pub fn decode(&self, code: i64) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(name, _)| *name)
    }
}
