//! Flat → hierarchical import
//!
//! Rebuilds a document from a decoded setfile using the same field
//! tables and naming as the encoder. Keys absent from the setfile leave
//! their field out, so structural validation of the result names
//! exactly what the setfile was missing.

use serde_json::{json, Map, Value};

use crate::schema::{
    logic_fields, EngineId, FieldContext, FieldScope, LogicName, SchemaResult, ValueFormat, ENGINE_FLAT_FIELDS,
    GROUP_FLAT_FIELDS, MAX_GROUP_COUNT,
};

use super::decoder::DecodedSetfile;
use super::naming::{engine_key, group_key, group_level_keys, logic_key};
use super::value::FlatValue;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub engines: Vec<EngineId>,
    /// Groups per engine; detected from the group-level keys when `None`
    pub group_count: Option<u32>,
    pub version: String,
    pub platform: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            engines: EngineId::ALL.to_vec(),
            group_count: None,
            version: "17.04".to_string(),
            platform: "MT4".to_string(),
        }
    }
}

/// Highest contiguous group number that has at least one group-level key
pub fn detect_group_count(setfile: &DecodedSetfile) -> u32 {
    let mut count = 0;
    while count < MAX_GROUP_COUNT
        && group_level_keys(count + 1)
        .iter()
        .any(|key| setfile.contains_key(key))
    {
        count += 1;
    }
    count
}

/// Builds the hierarchical document as JSON
pub fn import_document(setfile: &DecodedSetfile, options: &ImportOptions) -> SchemaResult<Value> {
    let group_count = options
        .group_count
        .unwrap_or_else(|| detect_group_count(setfile));

    let engines = options
        .engines
        .iter()
        .map(|&engine| import_engine(setfile, engine, group_count))
        .collect::<SchemaResult<Vec<Value>>>()?;

    Ok(json!({
        "version": options.version,
        "platform": options.platform,
        "engines": engines,
    }))
}

fn import_engine(setfile: &DecodedSetfile, engine: EngineId, group_count: u32) -> SchemaResult<Value> {
    let mut obj = Map::new();
    obj.insert("engine_id".into(), json!(engine));
    obj.insert("engine_name".into(), json!(format!("Engine {}", engine)));
    for spec in ENGINE_FLAT_FIELDS {
        insert_parsed(&mut obj, setfile, &engine_key(spec.token, engine), spec.name, spec.format)?;
    }

    let groups = (1..=group_count)
        .map(|group| import_group(setfile, engine, group))
        .collect::<SchemaResult<Vec<Value>>>()?;
    obj.insert("groups".into(), Value::Array(groups));

    Ok(Value::Object(obj))
}

fn import_group(setfile: &DecodedSetfile, engine: EngineId, group: u32) -> SchemaResult<Value> {
    let mut obj = Map::new();
    obj.insert("group_number".into(), json!(group));
    // not part of the flat format
    obj.insert("enabled".into(), json!(true));
    for spec in GROUP_FLAT_FIELDS {
        insert_parsed(&mut obj, setfile, &group_key(spec.token, group), spec.name, spec.format)?;
    }

    let logics = LogicName::ALL
        .iter()
        .map(|&logic| import_logic(setfile, engine, group, logic))
        .collect::<SchemaResult<Vec<Value>>>()?;
    obj.insert("logics".into(), Value::Array(logics));

    Ok(Value::Object(obj))
}

fn import_logic(setfile: &DecodedSetfile, engine: EngineId, group: u32, logic: LogicName) -> SchemaResult<Value> {
    let mut obj = Map::new();
    obj.insert("logic_name".into(), json!(logic));
    obj.insert("logic_id".into(), json!(logic.logic_id(engine, group)));

    for field in logic_fields(FieldContext::for_logic(logic, group), FieldScope::Full) {
        let key = logic_key(field.naming(), &field.token, engine, group, logic);
        insert_parsed(&mut obj, setfile, &key, &field.name, field.format())?;
    }

    Ok(Value::Object(obj))
}

fn insert_parsed(
    obj: &mut Map<String, Value>,
    setfile: &DecodedSetfile,
    key: &str,
    name: &str,
    format: ValueFormat,
) -> SchemaResult<()> {
    if let Some(raw) = setfile.get(key) {
        let value = FlatValue::parse_flat(raw, format, key)?;
        obj.insert(name.to_string(), value.to_json());
    }
    Ok(())
}
