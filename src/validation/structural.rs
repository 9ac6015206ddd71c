//! Structural validator
//!
//! Walks a hierarchical document once, without stopping at the first
//! defect:
//! - engine id set must be exactly {A, B, C} (warning)
//! - each engine has N groups numbered 1..N (warning)
//! - each group carries the group-level fields (error)
//! - each group has the 7 canonical logics (warning)
//! - each logic carries its base, non-Power and group-1 fields (error)
//!
//! A field whose value is `null` counts as missing; `engines`, `groups`
//! or `logics` holding anything but an array is an error. Engine ids
//! match exactly, so `"a"` is not engine A. The document is never
//! modified.

use serde_json::Value;

use crate::schema::{
    engine_path, group_path, logic_path, required_fields, EngineId, EntityKind, FieldContext, GroupVariant,
    LogicName, LogicVariant, LOGICS_PER_GROUP,
};

use super::report::{Finding, ValidationReport};

/// Context for entities whose field set does not vary
const UNCONDITIONAL: FieldContext = FieldContext {
    logic: LogicVariant::Standard,
    group: GroupVariant::First,
};

#[derive(Debug, Clone)]
pub struct StructuralValidator {
    group_count: u32,
}

impl StructuralValidator {
    pub fn new(group_count: u32) -> Self {
        Self { group_count }
    }

    pub fn validate(&self, doc: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();

        if present(doc, "engines").is_none() {
            report.push(Finding::missing_field("document", "engines"));
            return report;
        }
        let Some(engines) = array_field(doc, "document", "engines", &mut report) else {
            return report;
        };

        let mut seen = Vec::new();
        for (index, engine) in engines.iter().enumerate() {
            self.check_engine(index, engine, &mut seen, &mut report);
        }

        for id in EngineId::ALL {
            if !seen.contains(&id) {
                report.push(Finding::structural_warning(
                    "document",
                    format!("Missing engine {}", id),
                ));
            }
        }

        report
    }

    fn check_engine(&self, index: usize, engine: &Value, seen: &mut Vec<EngineId>, report: &mut ValidationReport) {
        report.record_checked(1);

        let raw_id = present(engine, "engine_id").and_then(Value::as_str);
        let label = raw_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index + 1));
        let path = engine_path(&label);

        require_fields(engine, &path, EntityKind::Engine, UNCONDITIONAL, report);

        match (present(engine, "engine_id"), raw_id) {
            (_, Some(raw)) => match EngineId::ALL.into_iter().find(|id| id.as_str() == raw) {
                Some(id) if seen.contains(&id) => {
                    report.push(Finding::structural_warning(&path, format!("Duplicate engine ID '{}'", raw)));
                }
                Some(id) => seen.push(id),
                None => {
                    report.push(Finding::structural_warning(&path, format!("Unexpected engine ID '{}'", raw)));
                }
            },
            (Some(other), None) => {
                report.push(Finding::structural_warning(&path, format!("Unexpected engine ID '{}'", other)));
            }
            (None, None) => {}
        }

        let Some(groups) = array_field(engine, &path, "groups", report) else {
            return;
        };

        if groups.len() != self.group_count as usize {
            report.push(Finding::structural_warning(
                &path,
                format!("{} has {} groups (expected {})", path, groups.len(), self.group_count),
            ));
        }

        for (index, group) in groups.iter().enumerate() {
            check_group(&label, index, group, report);
        }
    }
}

fn check_group(engine: &str, index: usize, group: &Value, report: &mut ValidationReport) {
    report.record_checked(1);

    let position = index as u64 + 1;
    let number = present(group, "group_number").and_then(Value::as_u64);
    let effective = number.unwrap_or(position);
    let path = group_path(engine, effective);

    if let Some(number) = number {
        if number != position {
            report.push(Finding::structural_warning(
                &path,
                format!("{} is at position {}; group numbers must run 1..N", path, position),
            ));
        }
    }

    require_fields(group, &path, EntityKind::Group, UNCONDITIONAL, report);

    let Some(logics) = array_field(group, &path, "logics", report) else {
        return;
    };

    if logics.len() != LOGICS_PER_GROUP {
        report.push(Finding::structural_warning(
            &path,
            format!("{} has {} logics (expected {})", path, logics.len(), LOGICS_PER_GROUP),
        ));
    }

    let group_variant = GroupVariant::of(u32::try_from(effective).unwrap_or(u32::MAX));
    let mut seen = Vec::new();
    for (index, logic) in logics.iter().enumerate() {
        check_logic(engine, effective, index, logic, group_variant, &mut seen, report);
    }

    for name in LogicName::ALL {
        if !seen.contains(&name) {
            report.push(Finding::structural_warning(&path, format!("{} has no {} logic", path, name)));
        }
    }
}

fn check_logic(
    engine: &str,
    group: u64,
    index: usize,
    logic: &Value,
    group_variant: GroupVariant,
    seen: &mut Vec<LogicName>,
    report: &mut ValidationReport,
) {
    report.record_checked(1);

    let raw_name = present(logic, "logic_name").and_then(Value::as_str);
    // A logic without a name is checked as the canonical logic for its slot
    let name = match raw_name {
        Some(raw) => LogicName::parse(raw),
        None => LogicName::ALL.get(index).copied(),
    };
    let label = match (raw_name, name) {
        (Some(raw), _) => raw.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => format!("Logic #{}", index + 1),
    };
    let path = logic_path(engine, group, &label);

    match (raw_name, name) {
        (Some(raw), None) => {
            report.push(Finding::structural_warning(&path, format!("Unexpected logic name '{}'", raw)));
        }
        (_, Some(name)) if seen.contains(&name) => {
            report.push(Finding::structural_warning(&path, format!("Duplicate logic '{}'", name)));
        }
        (_, Some(name)) => seen.push(name),
        (None, None) => {}
    }

    let variant = name.map(|n| n.variant()).unwrap_or(LogicVariant::Standard);
    require_fields(
        logic,
        &path,
        EntityKind::Logic,
        FieldContext::new(variant, group_variant),
        report,
    );
}

fn require_fields(value: &Value, path: &str, kind: EntityKind, ctx: FieldContext, report: &mut ValidationReport) {
    for field in required_fields(kind, ctx) {
        if present(value, field).is_none() {
            report.push(Finding::missing_field(path, field));
        }
    }
}

/// The array under `field`; a missing field is reported by the required
/// field check, any other non-array value is reported here
fn array_field<'a>(
    value: &'a Value,
    path: &str,
    field: &str,
    report: &mut ValidationReport,
) -> Option<&'a Vec<Value>> {
    match present(value, field) {
        Some(Value::Array(items)) => Some(items),
        Some(_) => {
            report.push(Finding::not_an_array(path, field));
            None
        }
        None => None,
    }
}

fn present<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value.get(field).filter(|v| !v.is_null())
}

/// Validates `doc` against `group_count` groups per engine
pub fn validate_structure(doc: &Value, group_count: u32) -> ValidationReport {
    StructuralValidator::new(group_count).validate(doc)
}
