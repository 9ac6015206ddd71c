//! Identity types for the engine → group → logic hierarchy
//!
//! Engine prefixes and logic abbreviations are fixed lookup tables.
//! Every flat key embeds them, so the encoder, the importer and the
//! parity validator all read the same constants below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::SchemaError;

/// Number of logics every group carries.
pub const LOGICS_PER_GROUP: usize = 7;

/// Default number of groups per engine.
pub const DEFAULT_GROUP_COUNT: u32 = 15;

/// Upper bound on groups per engine accepted anywhere a count is given.
pub const MAX_GROUP_COUNT: u32 = 100;

/// Flat-key prefix per engine, indexed by `EngineId as usize`.
pub const ENGINE_PREFIXES: [&str; 3] = ["", "B", "C"];

/// Flat-key abbreviation per logic, indexed by `LogicName as usize`.
pub const LOGIC_ABBREVIATIONS: [&str; LOGICS_PER_GROUP] = ["P", "R", "S", "ST", "STO", "SCA", "RPO"];

/// Engine identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EngineId {
    A,
    B,
    C,
}

impl EngineId {
    /// All engines in canonical order
    pub const ALL: [EngineId; 3] = [EngineId::A, EngineId::B, EngineId::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineId::A => "A",
            EngineId::B => "B",
            EngineId::C => "C",
        }
    }

    /// Prefix this engine contributes to every flat key
    pub fn prefix(&self) -> &'static str {
        ENGINE_PREFIXES[*self as usize]
    }

    /// Parses an engine identifier, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(EngineId::A),
            "B" => Some(EngineId::B),
            "C" => Some(EngineId::C),
            _ => None,
        }
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngineId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SchemaError::UnknownEngine(s.to_string()))
    }
}

/// Canonical logic names
///
/// Declaration order is the canonical order inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicName {
    Power,
    Repower,
    Scalper,
    Stopper,
    #[serde(rename = "STO")]
    Sto,
    #[serde(rename = "SCA")]
    Sca,
    #[serde(rename = "RPO")]
    Rpo,
}

impl LogicName {
    /// All logics in canonical order
    pub const ALL: [LogicName; LOGICS_PER_GROUP] = [
        LogicName::Power,
        LogicName::Repower,
        LogicName::Scalper,
        LogicName::Stopper,
        LogicName::Sto,
        LogicName::Sca,
        LogicName::Rpo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicName::Power => "Power",
            LogicName::Repower => "Repower",
            LogicName::Scalper => "Scalper",
            LogicName::Stopper => "Stopper",
            LogicName::Sto => "STO",
            LogicName::Sca => "SCA",
            LogicName::Rpo => "RPO",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        LOGIC_ABBREVIATIONS[*self as usize]
    }

    /// Which conditional field set applies to this logic
    pub fn variant(&self) -> LogicVariant {
        match self {
            LogicName::Power => LogicVariant::Power,
            _ => LogicVariant::Standard,
        }
    }

    /// Parses a logic name case-insensitively. Accepts `Scalp` for Scalper.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("scalp") {
            return Some(LogicName::Scalper);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|logic| logic.as_str().eq_ignore_ascii_case(s))
    }

    /// Identifier string used in generated documents, e.g. `B_Stopper_G3`
    pub fn logic_id(&self, engine: EngineId, group: u32) -> String {
        format!("{}_{}_G{}", engine, self.as_str(), group)
    }
}

impl fmt::Display for LogicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogicName {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| SchemaError::UnknownLogic(s.to_string()))
    }
}

/// Power logics skip the level/last-lot pair every other logic carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicVariant {
    Power,
    Standard,
}

/// Group 1 carries the entry-trigger fields, later groups do not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupVariant {
    First,
    Subsequent,
}

impl GroupVariant {
    pub fn of(group_number: u32) -> Self {
        if group_number == 1 {
            GroupVariant::First
        } else {
            GroupVariant::Subsequent
        }
    }
}

/// Context that selects the conditional field sets for a logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldContext {
    pub logic: LogicVariant,
    pub group: GroupVariant,
}

impl FieldContext {
    pub fn new(logic: LogicVariant, group: GroupVariant) -> Self {
        Self { logic, group }
    }

    pub fn for_logic(logic: LogicName, group_number: u32) -> Self {
        Self::new(logic.variant(), GroupVariant::of(group_number))
    }
}

/// `Engine A`
pub fn engine_path(engine: impl fmt::Display) -> String {
    format!("Engine {}", engine)
}

/// `Engine A Group 3`
pub fn group_path(engine: impl fmt::Display, group: impl fmt::Display) -> String {
    format!("Engine {} Group {}", engine, group)
}

/// `Engine A Group 3 Stopper`
pub fn logic_path(engine: impl fmt::Display, group: impl fmt::Display, logic: impl fmt::Display) -> String {
    format!("Engine {} Group {} {}", engine, group, logic)
}

/// Entity kinds in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Engine,
    Group,
    Logic,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Engine => write!(f, "engine"),
            EntityKind::Group => write!(f, "group"),
            EntityKind::Logic => write!(f, "logic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviation_table_matches_declaration_order() {
        let expected = [
            (LogicName::Power, "P"),
            (LogicName::Repower, "R"),
            (LogicName::Scalper, "S"),
            (LogicName::Stopper, "ST"),
            (LogicName::Sto, "STO"),
            (LogicName::Sca, "SCA"),
            (LogicName::Rpo, "RPO"),
        ];
        for (logic, abbrev) in expected {
            assert_eq!(logic.abbreviation(), abbrev);
        }
    }

    #[test]
    fn test_engine_prefixes() {
        assert_eq!(EngineId::A.prefix(), "");
        assert_eq!(EngineId::B.prefix(), "B");
        assert_eq!(EngineId::C.prefix(), "C");
    }

    #[test]
    fn test_logic_parse_is_case_insensitive() {
        assert_eq!(LogicName::parse("stopper"), Some(LogicName::Stopper));
        assert_eq!(LogicName::parse("sto"), Some(LogicName::Sto));
        assert_eq!(LogicName::parse("Scalp"), Some(LogicName::Scalper));
        assert_eq!(LogicName::parse("Turbo"), None);
    }

    #[test]
    fn test_logic_serde_names() {
        let json = serde_json::to_string(&LogicName::Rpo).unwrap();
        assert_eq!(json, "\"RPO\"");
        let parsed: LogicName = serde_json::from_str("\"Repower\"").unwrap();
        assert_eq!(parsed, LogicName::Repower);
    }

    #[test]
    fn test_only_power_is_power_variant() {
        for logic in LogicName::ALL {
            let expected = if logic == LogicName::Power {
                LogicVariant::Power
            } else {
                LogicVariant::Standard
            };
            assert_eq!(logic.variant(), expected);
        }
    }

    #[test]
    fn test_group_variant() {
        assert_eq!(GroupVariant::of(1), GroupVariant::First);
        assert_eq!(GroupVariant::of(2), GroupVariant::Subsequent);
        assert_eq!(GroupVariant::of(20), GroupVariant::Subsequent);
    }

    #[test]
    fn test_logic_id() {
        assert_eq!(LogicName::Stopper.logic_id(EngineId::B, 3), "B_Stopper_G3");
    }
}
