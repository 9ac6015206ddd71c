//! Boolean coercion audit
//!
//! Setfile booleans must be `0`/`1` and document booleans must be JSON
//! booleans. Some exporters write `true`/`false` into the setfile for a
//! few fields (close-partial slots among them), or quote booleans in
//! documents. These audits flag every such value as a warning.

use std::collections::HashSet;

use serde_json::Value;

use crate::schema::{
    logic_fields, logic_path, EngineId, FieldContext, FieldScope, GroupVariant, LogicName, LogicVariant,
    ValueFormat, GROUP_FLAT_FIELDS,
};
use crate::setfile::{group_key, logic_key, DecodedSetfile};

use super::report::{Finding, ValidationReport};

/// Flags setfile boolean keys whose raw value is not `0` or `1`
pub fn audit_flat_booleans(setfile: &DecodedSetfile, engines: &[EngineId], group_count: u32) -> ValidationReport {
    let mut report = ValidationReport::new();

    for group in 1..=group_count {
        for spec in GROUP_FLAT_FIELDS.iter().filter(|s| s.format == ValueFormat::Bool) {
            let key = group_key(spec.token, group);
            check_flat(setfile, &format!("Group {}", group), &key, &mut report);
        }
    }

    for &engine in engines {
        for group in 1..=group_count {
            for logic in LogicName::ALL {
                let path = logic_path(engine, group, logic);
                let ctx = FieldContext::for_logic(logic, group);
                for field in logic_fields(ctx, FieldScope::Full)
                    .into_iter()
                    .filter(|f| f.format() == ValueFormat::Bool)
                {
                    let key = logic_key(field.naming(), &field.token, engine, group, logic);
                    check_flat(setfile, &path, &key, &mut report);
                }
            }
        }
    }

    report
}

fn check_flat(setfile: &DecodedSetfile, path: &str, key: &str, report: &mut ValidationReport) {
    report.record_checked(1);
    if let Some(raw) = setfile.get(key) {
        if raw != "0" && raw != "1" {
            report.push(Finding::coercion_warning(
                path,
                key,
                format!("Non-canonical boolean for key {}: '{}'", key, raw),
            ));
        }
    }
}

/// Flags document boolean fields whose value is not a JSON boolean
pub fn audit_document_booleans(doc: &Value) -> ValidationReport {
    let mut report = ValidationReport::new();

    // Widest context, so every boolean field name is covered
    let logic_booleans: HashSet<String> = logic_fields(
        FieldContext::new(LogicVariant::Standard, GroupVariant::First),
        FieldScope::Full,
    )
    .into_iter()
    .filter(|f| f.format() == ValueFormat::Bool)
    .map(|f| f.name.into_owned())
    .collect();

    let mut group_booleans: HashSet<&str> = GROUP_FLAT_FIELDS
        .iter()
        .filter(|s| s.format == ValueFormat::Bool)
        .map(|s| s.name)
        .collect();
    group_booleans.insert("enabled");

    let engines = doc.get("engines").and_then(Value::as_array);
    for (e, engine) in engines.into_iter().flatten().enumerate() {
        let engine_label = label(engine, "engine_id", e);
        let groups = engine.get("groups").and_then(Value::as_array);
        for (g, group) in groups.into_iter().flatten().enumerate() {
            let group_label = label(group, "group_number", g);
            let path = format!("Engine {} Group {}", engine_label, group_label);
            check_object(group, &path, |name| group_booleans.contains(name), &mut report);

            let logics = group.get("logics").and_then(Value::as_array);
            for (l, logic) in logics.into_iter().flatten().enumerate() {
                let path = logic_path(&engine_label, &group_label, label(logic, "logic_name", l));
                check_object(logic, &path, |name| logic_booleans.contains(name), &mut report);
            }
        }
    }

    report
}

fn check_object(value: &Value, path: &str, is_boolean: impl Fn(&str) -> bool, report: &mut ValidationReport) {
    let Some(obj) = value.as_object() else {
        return;
    };
    for (name, field) in obj {
        if !is_boolean(name) {
            continue;
        }
        report.record_checked(1);
        if !field.is_boolean() && !field.is_null() {
            report.push(Finding::coercion_warning(
                path,
                name.as_str(),
                format!("{}: Non-boolean value for '{}': {}", path, name, field),
            ));
        }
    }
}

fn label(value: &Value, field: &str, index: usize) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("#{}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_document, GeneratorConfig};
    use crate::setfile::{encode_document, parse_setfile, render_setfile};
    use serde_json::json;

    fn generated() -> (Value, String) {
        let doc = build_document(&GeneratorConfig {
            group_count: 1,
            ..GeneratorConfig::default()
        });
        let entries = encode_document(&doc).unwrap();
        let text = render_setfile(&doc, &entries, false);
        (serde_json::to_value(&doc).unwrap(), text)
    }

    #[test]
    fn test_generated_output_is_canonical() {
        let (doc, text) = generated();
        let flat = audit_flat_booleans(&parse_setfile(&text), &EngineId::ALL, 1);
        assert!(flat.warnings().is_empty());
        assert!(flat.checked() > 0);
        assert!(audit_document_booleans(&doc).warnings().is_empty());
    }

    #[test]
    fn test_literal_true_in_setfile_is_flagged() {
        let (_, text) = generated();
        let text = text.replace("gInput_ClosePartial2_BST1=0", "gInput_ClosePartial2_BST1=true");
        let report = audit_flat_booleans(&parse_setfile(&text), &EngineId::ALL, 1);
        assert!(report.passed());
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].field.as_deref(), Some("gInput_ClosePartial2_BST1"));
        assert_eq!(report.warnings()[0].path, "Engine B Group 1 Stopper");
    }

    #[test]
    fn test_non_boolean_document_values_are_flagged() {
        let (mut doc, _) = generated();
        doc["engines"][0]["groups"][0]["logics"][2]["close_partial_3"] = json!("false");
        doc["engines"][0]["groups"][0]["hedge_mode"] = json!(0);
        let report = audit_document_booleans(&doc);
        let fields: Vec<&str> = report
            .warnings()
            .iter()
            .filter_map(|w| w.field.as_deref())
            .collect();
        assert_eq!(fields, vec!["hedge_mode", "close_partial_3"]);
    }
}
