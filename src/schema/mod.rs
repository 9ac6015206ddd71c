//! Schema model for setparity
//!
//! Single source of truth for:
//! - Engine prefixes and logic abbreviations
//! - Required field sets per entity, selected by logic and group variant
//! - Flat-key naming templates and value formats per field
//! - Enumeration-to-code tables
//!
//! The encoder, importer, structural validator and parity validator all
//! read these tables. None of them keeps its own copy.

mod codes;
mod errors;
mod fields;
mod types;

pub use codes::CodeTable;
pub use errors::{SchemaError, SchemaResult};
pub use fields::{
    find_logic_field, logic_fields, required_fields, Fallback, FieldScope, FieldSpec,
    NamingTemplate, ResolvedField, ValueFormat, BASE_LOGIC_FIELDS, CLOSE_PARTIAL_SLOTS, ENGINE_FLAT_FIELDS,
    ENGINE_REQUIRED_FIELDS, FIRST_GROUP_FIELDS, GROUP_FLAT_FIELDS, GROUP_REQUIRED_FIELDS, LOGIC_IDENTITY_FIELDS,
    STANDARD_LOGIC_FIELDS, TRAIL_STEP_SLOTS,
};
pub use types::{
    engine_path, group_path, logic_path, EngineId, EntityKind, FieldContext, GroupVariant, LogicName, LogicVariant,
    DEFAULT_GROUP_COUNT, ENGINE_PREFIXES, LOGICS_PER_GROUP, LOGIC_ABBREVIATIONS, MAX_GROUP_COUNT,
};
