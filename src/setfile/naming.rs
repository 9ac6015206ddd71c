//! Flat-key naming
//!
//! `suffix = engine prefix + logic abbreviation + group number` and
//! `short = engine prefix + logic abbreviation`. Each field's template
//! decides where its token goes relative to those.

use crate::schema::{
    logic_fields, EngineId, FieldContext, FieldScope, LogicName, NamingTemplate, ENGINE_FLAT_FIELDS,
    GROUP_FLAT_FIELDS,
};

/// `B` + `ST` + `3` → `BST3`
pub fn logic_suffix(engine: EngineId, logic: LogicName, group: u32) -> String {
    format!("{}{}{}", engine.prefix(), logic.abbreviation(), group)
}

/// `B` + `ST` → `BST`
pub fn logic_short(engine: EngineId, logic: LogicName) -> String {
    format!("{}{}", engine.prefix(), logic.abbreviation())
}

/// Renders the flat key for a logic field token
pub fn logic_key(naming: NamingTemplate, token: &str, engine: EngineId, group: u32, logic: LogicName) -> String {
    match naming {
        NamingTemplate::Suffixed => format!("gInput_{}_{}", token, logic_suffix(engine, logic, group)),
        NamingTemplate::SuffixLeading => format!("gInput_{}_{}", logic_suffix(engine, logic, group), token),
        NamingTemplate::GroupLeading => format!("gInput_G{}_{}_{}", group, token, logic_short(engine, logic)),
        NamingTemplate::GroupTrailing => format!("gInput_G{}_{}_{}", group, logic_short(engine, logic), token),
        NamingTemplate::GroupScale => format!("gInput_G{}_Scale_{}_{}", group, logic_short(engine, logic), token),
        NamingTemplate::GroupControl => group_key(token, group),
        NamingTemplate::EngineTrailing => engine_key(token, engine),
    }
}

/// `gInput_Group<g>_<Token>`
pub fn group_key(token: &str, group: u32) -> String {
    format!("gInput_Group{}_{}", group, token)
}

/// `gInput_<Token><prefix>`
pub fn engine_key(token: &str, engine: EngineId) -> String {
    format!("gInput_{}{}", token, engine.prefix())
}

/// Every flat key one logic contributes, in canonical field order
pub fn expected_keys(engine: EngineId, group: u32, logic: LogicName, scope: FieldScope) -> Vec<String> {
    logic_fields(FieldContext::for_logic(logic, group), scope)
        .iter()
        .map(|field| logic_key(field.naming(), &field.token, engine, group, logic))
        .collect()
}

/// Group-level keys, shared by all engines
pub fn group_level_keys(group: u32) -> Vec<String> {
    GROUP_FLAT_FIELDS
        .iter()
        .map(|spec| group_key(spec.token, group))
        .collect()
}

/// Engine-level keys
pub fn engine_level_keys(engine: EngineId) -> Vec<String> {
    ENGINE_FLAT_FIELDS
        .iter()
        .map(|spec| engine_key(spec.token, engine))
        .collect()
}
