//! Flat-key encoder
//!
//! Turns a document into ordered `key=value` entries:
//! engine keys, then per group the group-level keys (first engine to
//! reach a group number wins), then each logic's fields in canonical
//! order.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::model::{Document, Engine, Group, Logic};
use crate::observability::Event;
use crate::schema::{
    engine_path, find_logic_field, group_path, logic_fields, logic_path, EngineId, EntityKind, FieldContext,
    FieldScope, FieldSpec, LogicName, ResolvedField, SchemaError, SchemaResult, ENGINE_FLAT_FIELDS,
    GROUP_FLAT_FIELDS, LOGICS_PER_GROUP,
};

use super::naming::{engine_key, group_key, logic_key};
use super::value::FlatValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    pub key: String,
    pub value: String,
}

impl FlatEntry {
    fn new(key: String, value: &FlatValue) -> Self {
        Self {
            key,
            value: value.render_flat(),
        }
    }
}

/// Encodes the whole document
pub fn encode_document(doc: &Document) -> SchemaResult<Vec<FlatEntry>> {
    let mut entries = Vec::new();
    let mut group_values: HashMap<String, String> = HashMap::new();

    for engine in &doc.engines {
        for spec in ENGINE_FLAT_FIELDS {
            let value = engine_value(engine, spec)?;
            entries.push(FlatEntry::new(engine_key(spec.token, engine.engine_id), &value));
        }

        for group in &engine.groups {
            for spec in GROUP_FLAT_FIELDS {
                let key = group_key(spec.token, group.group_number);
                let value = group_value(engine.engine_id, group, spec)?.render_flat();
                match group_values.get(&key) {
                    None => {
                        group_values.insert(key.clone(), value.clone());
                        entries.push(FlatEntry { key, value });
                    }
                    Some(first) if *first != value => {
                        warn!(
                            event = Event::GroupKeyConflict.as_str(),
                            key = %key,
                            kept = %first,
                            ignored = %value,
                            engine = %engine.engine_id,
                        );
                    }
                    Some(_) => {}
                }
            }

            for logic in &group.logics {
                encode_logic(engine.engine_id, group.group_number, logic, &mut entries)?;
            }
        }
    }

    Ok(entries)
}

/// Encodes one logic field of the document
///
/// Fails with `SchemaMismatch` when `field` is not a flattenable field
/// of that logic in that group.
pub fn encode_field(
    doc: &Document,
    engine: EngineId,
    group: u32,
    logic: LogicName,
    field: &str,
) -> SchemaResult<FlatEntry> {
    let ctx = FieldContext::for_logic(logic, group);
    let resolved = find_logic_field(ctx, field)?;

    let found = doc
        .engine(engine)
        .ok_or_else(|| SchemaError::missing("document", engine_path(engine)))?
        .group(group)
        .ok_or_else(|| SchemaError::missing(engine_path(engine), format!("Group {}", group)))?
        .logic(logic)
        .ok_or_else(|| SchemaError::missing(group_path(engine, group), logic.as_str()))?;

    let path = logic_path(engine, group, logic);
    let map = logic_map(found, &path)?;
    let value = field_value(&map, &resolved, &path)?;
    Ok(FlatEntry::new(
        logic_key(resolved.naming(), &resolved.token, engine, group, logic),
        &value,
    ))
}

fn encode_logic(engine: EngineId, group: u32, logic: &Logic, out: &mut Vec<FlatEntry>) -> SchemaResult<()> {
    let ctx = FieldContext::for_logic(logic.logic_name, group);
    let path = logic_path(engine, group, logic.logic_name);
    let fields = logic_fields(ctx, FieldScope::Full);

    if let Some(unknown) = logic
        .extended
        .keys()
        .find(|key| !fields.iter().any(|f| f.name == key.as_str()))
    {
        return Err(SchemaError::mismatch(EntityKind::Logic, unknown.clone()));
    }

    let map = logic_map(logic, &path)?;
    for field in &fields {
        let value = field_value(&map, field, &path)?;
        out.push(FlatEntry::new(
            logic_key(field.naming(), &field.token, engine, group, logic.logic_name),
            &value,
        ));
    }
    Ok(())
}

fn logic_map(logic: &Logic, path: &str) -> SchemaResult<Map<String, Value>> {
    match serde_json::to_value(logic) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SchemaError::invalid(path, "logic", other)),
        Err(e) => Err(SchemaError::invalid(path, "logic", e)),
    }
}

fn field_value(map: &Map<String, Value>, field: &ResolvedField, path: &str) -> SchemaResult<FlatValue> {
    match map.get(&*field.name).filter(|v| !v.is_null()) {
        Some(value) => FlatValue::from_json(value, field.format(), path, &field.name),
        None => match field.spec.fallback {
            Some(fallback) if !field.is_required() => FlatValue::from_fallback(fallback, field.format()),
            _ => Err(SchemaError::missing(path, &*field.name)),
        },
    }
}

fn engine_value(engine: &Engine, spec: &FieldSpec) -> SchemaResult<FlatValue> {
    let value = match spec.name {
        "max_power_orders" => json!(engine.max_power_orders),
        other => return Err(SchemaError::mismatch(EntityKind::Engine, other)),
    };
    FlatValue::from_json(&value, spec.format, &engine_path(engine.engine_id), spec.name)
}

fn group_value(engine: EngineId, group: &Group, spec: &FieldSpec) -> SchemaResult<FlatValue> {
    let value = match spec.name {
        "reverse_mode" => json!(group.reverse_mode),
        "hedge_mode" => json!(group.hedge_mode),
        "hedge_reference" => json!(group.hedge_reference),
        "entry_delay_bars" => json!(group.entry_delay_bars),
        other => return Err(SchemaError::mismatch(EntityKind::Group, other)),
    };
    FlatValue::from_json(&value, spec.format, &group_path(engine, group.group_number), spec.name)
}

/// Renders entries as setfile text, optionally behind a `;` header
pub fn render_setfile(doc: &Document, entries: &[FlatEntry], include_header: bool) -> String {
    let mut out = String::with_capacity(entries.len() * 40);

    if include_header {
        let engines: Vec<&str> = doc.engines.iter().map(|e| e.engine_id.as_str()).collect();
        out.push_str("; setparity export\n");
        out.push_str(&format!("; Version: {} | Platform: {}\n", doc.version, doc.platform));
        out.push_str(&format!(
            "; Generated: {}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!(
            "; Engines: {} | Groups: {} | Logics per group: {}\n",
            engines.join(", "),
            doc.group_count(),
            LOGICS_PER_GROUP
        ));
        out.push_str(&format!("; Keys: {}\n;\n", entries.len()));
    }

    for entry in entries {
        out.push_str(&entry.key);
        out.push('=');
        out.push_str(&entry.value);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_document, GeneratorConfig};
    use std::collections::HashSet;

    fn small_document() -> Document {
        build_document(&GeneratorConfig {
            group_count: 2,
            ..GeneratorConfig::default()
        })
    }

    fn lookup<'a>(entries: &'a [FlatEntry], key: &str) -> Option<&'a str> {
        entries.iter().find(|e| e.key == key).map(|e| e.value.as_str())
    }

    #[test]
    fn test_keys_are_unique() {
        let entries = encode_document(&small_document()).unwrap();
        let keys: HashSet<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys.len(), entries.len());
    }

    #[test]
    fn test_value_formats() {
        let entries = encode_document(&small_document()).unwrap();
        assert_eq!(lookup(&entries, "gInput_Initial_loT_P1"), Some("0.02"));
        assert_eq!(lookup(&entries, "gInput_Mult_BR2"), Some("1.20"));
        assert_eq!(lookup(&entries, "gInput_Grid_CST1"), Some("300.0"));
        assert_eq!(lookup(&entries, "gInput_Trail_P1"), Some("0"));
        assert_eq!(lookup(&entries, "gInput_G2_Scale_BSTO_Hedge"), Some("50.00"));
        assert_eq!(lookup(&entries, "gInput_G1_UseTP_SCA"), Some("0"));
        assert_eq!(lookup(&entries, "gInput_Start_RPO1"), Some("1"));
        assert_eq!(lookup(&entries, "gInput_ClosePartialBalance_P1"), Some("1"));
        assert_eq!(lookup(&entries, "gInput_MaxPowerOrdersB"), Some("10"));
        assert_eq!(lookup(&entries, "gInput_Group2_HedgeReference"), Some("Logic_None"));
        assert_eq!(lookup(&entries, "gInput_LastLot_R1"), Some("0.12"));
        assert_eq!(lookup(&entries, "gInput_LastLot_P1"), None);
    }

    #[test]
    fn test_order_follows_hierarchy() {
        let entries = encode_document(&small_document()).unwrap();
        assert_eq!(entries[0].key, "gInput_MaxPowerOrders");
        assert_eq!(entries[1].key, "gInput_Group1_ReverseMode");
        assert_eq!(entries[5].key, "gInput_Start_P1");
        assert_eq!(entries[6].key, "gInput_Initial_loT_P1");
    }

    #[test]
    fn test_group_keys_emitted_once() {
        let entries = encode_document(&small_document()).unwrap();
        let count = entries
            .iter()
            .filter(|e| e.key == "gInput_Group1_HedgeMode")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_first_engine_wins_group_conflict() {
        let mut doc = small_document();
        doc.engines[1].groups[0].entry_delay_bars = 5;
        let entries = encode_document(&doc).unwrap();
        assert_eq!(lookup(&entries, "gInput_Group1_EntryDelayBars"), Some("0"));
    }

    #[test]
    fn test_missing_required_value_fails() {
        let mut doc = small_document();
        doc.engines[0].groups[1].logics[3].start_level = None;
        let err = encode_document(&doc).unwrap_err();
        assert_eq!(
            err,
            SchemaError::missing("Engine A Group 2 Stopper", "start_level")
        );
    }

    #[test]
    fn test_missing_extension_uses_fallback() {
        let mut doc = small_document();
        doc.engines[0].groups[0].logics[0].extended.remove("trail_step_cycle_4");
        doc.engines[0].groups[0].logics[0].allow_sell = None;
        let entries = encode_document(&doc).unwrap();
        assert_eq!(lookup(&entries, "gInput_TrailStepCycle4_P1"), Some("1"));
        assert_eq!(lookup(&entries, "gInput_AllowSell_P1"), Some("1"));
    }

    #[test]
    fn test_unknown_extension_is_schema_mismatch() {
        let mut doc = small_document();
        doc.engines[0].groups[0].logics[0]
            .extended
            .insert("trail_step_8".to_string(), json!(1500.0));
        let err = encode_document(&doc).unwrap_err();
        assert_eq!(err.code(), "SETPARITY_SCHEMA_MISMATCH");
    }

    #[test]
    fn test_unknown_label_fails() {
        let mut doc = small_document();
        doc.engines[2].groups[0].logics[1].trail_method = "Fibonacci".to_string();
        let err = encode_document(&doc).unwrap_err();
        assert_eq!(err.code(), "SETPARITY_UNKNOWN_CODE");
    }

    #[test]
    fn test_encode_single_field() {
        let doc = small_document();
        let entry = encode_field(&doc, EngineId::B, 2, LogicName::Stopper, "reverse_enabled").unwrap();
        assert_eq!(entry.key, "gInput_G2_BST_ReverseEnabled");
        assert_eq!(entry.value, "0");

        let err = encode_field(&doc, EngineId::B, 2, LogicName::Stopper, "trigger_type").unwrap_err();
        assert_eq!(err.code(), "SETPARITY_SCHEMA_MISMATCH");

        let err = encode_field(&doc, EngineId::A, 2, LogicName::Power, "bogus").unwrap_err();
        assert_eq!(err.code(), "SETPARITY_SCHEMA_MISMATCH");
    }

    #[test]
    fn test_render_with_and_without_header() {
        let doc = small_document();
        let entries = encode_document(&doc).unwrap();

        let bare = render_setfile(&doc, &entries, false);
        assert!(bare.starts_with("gInput_MaxPowerOrders=10\n"));
        assert_eq!(bare.lines().count(), entries.len());

        let with_header = render_setfile(&doc, &entries, true);
        assert!(with_header.starts_with("; setparity export\n"));
        assert!(with_header.contains("; Engines: A, B, C | Groups: 2 | Logics per group: 7\n"));
    }
}
