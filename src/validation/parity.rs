//! Parity validator
//!
//! Regenerates every flat key the schema expects for engines × groups
//! 1..N × the 7 canonical logics, plus group-level keys (once per group
//! number) and engine-level keys (once per engine), and checks that each
//! exists in a decoded setfile. Values are not inspected.

use std::collections::HashSet;

use tracing::debug;

use crate::schema::{engine_path, logic_path, EngineId, FieldScope, LogicName};
use crate::setfile::{engine_level_keys, expected_keys, group_level_keys, DecodedSetfile};

use super::report::{Finding, ValidationReport};

#[derive(Debug, Clone)]
pub struct ParityValidator {
    engines: Vec<EngineId>,
    group_count: u32,
    scope: FieldScope,
}

impl ParityValidator {
    /// Checks all three engines at full scope
    pub fn new(group_count: u32) -> Self {
        Self {
            engines: EngineId::ALL.to_vec(),
            group_count,
            scope: FieldScope::Full,
        }
    }

    pub fn with_engines(mut self, engines: Vec<EngineId>) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// Every key this validator requires, in check order
    pub fn expected(&self) -> Vec<(String, String)> {
        let mut keys = Vec::new();
        let mut groups_seen = HashSet::new();

        for &engine in &self.engines {
            let path = engine_path(engine);
            keys.extend(engine_level_keys(engine).into_iter().map(|k| (path.clone(), k)));

            for group in 1..=self.group_count {
                if groups_seen.insert(group) {
                    let path = format!("Group {}", group);
                    keys.extend(group_level_keys(group).into_iter().map(|k| (path.clone(), k)));
                }

                for logic in LogicName::ALL {
                    let path = logic_path(engine, group, logic);
                    keys.extend(
                        expected_keys(engine, group, logic, self.scope)
                            .into_iter()
                            .map(|k| (path.clone(), k)),
                    );
                }
            }
        }

        keys
    }

    pub fn validate(&self, setfile: &DecodedSetfile) -> ValidationReport {
        let mut report = ValidationReport::new();

        let expected = self.expected();
        report.record_checked(expected.len());
        for (path, key) in expected {
            if !setfile.contains_key(&key) {
                report.push(Finding::missing_key(path, key));
            }
        }

        let next = self.group_count.saturating_add(1);
        if group_level_keys(next).iter().any(|k| setfile.contains_key(k)) {
            report.push(Finding::parity_warning(
                "setfile",
                format!(
                    "Setfile has group-level keys for group {} but only {} groups were checked",
                    next, self.group_count
                ),
            ));
        }

        if setfile.duplicate_keys() > 0 {
            report.push(Finding::parity_warning(
                "setfile",
                format!(
                    "Setfile repeats {} key(s); the last occurrence of each was used",
                    setfile.duplicate_keys()
                ),
            ));
        }

        debug!(
            checked = report.checked(),
            missing = report.errors().len(),
            "parity check finished"
        );

        report
    }
}

/// Checks `setfile` for every key of `engines` × groups 1..=`group_count`
pub fn validate_parity(setfile: &DecodedSetfile, engines: &[EngineId], group_count: u32) -> ValidationReport {
    ParityValidator::new(group_count)
        .with_engines(engines.to_vec())
        .validate(setfile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_document, GeneratorConfig};
    use crate::setfile::{encode_document, parse_setfile, render_setfile};

    fn generated(groups: u32) -> String {
        let doc = build_document(&GeneratorConfig {
            group_count: groups,
            ..GeneratorConfig::default()
        });
        let entries = encode_document(&doc).unwrap();
        render_setfile(&doc, &entries, true)
    }

    #[test]
    fn test_generated_setfile_has_parity() {
        let setfile = parse_setfile(&generated(3));
        let report = ParityValidator::new(3).validate(&setfile);
        assert!(report.passed(), "{:?}", report.errors().first());
        assert!(report.warnings().is_empty());
        assert_eq!(report.checked(), setfile.len());
    }

    #[test]
    fn test_removed_key_is_reported() {
        let text = generated(2).replace("gInput_G2_BST_ReverseEnabled=0\n", "");
        let report = ParityValidator::new(2).validate(&parse_setfile(&text));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].message, "Missing key: gInput_G2_BST_ReverseEnabled");
        assert_eq!(report.errors()[0].path, "Engine B Group 2 Stopper");
    }

    #[test]
    fn test_group_keys_checked_once() {
        let text = generated(1).replace("gInput_Group1_EntryDelayBars=0\n", "");
        let report = ParityValidator::new(1).validate(&parse_setfile(&text));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].path, "Group 1");
    }

    #[test]
    fn test_extra_group_is_warning() {
        let report = ParityValidator::new(2).validate(&parse_setfile(&generated(3)));
        assert!(report.passed());
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn test_short_setfile_reports_whole_group() {
        let setfile = parse_setfile(&generated(1));
        let core = ParityValidator::new(2).with_scope(FieldScope::Core);
        let report = core.validate(&setfile);
        let per_group = 4 + EngineId::ALL
            .into_iter()
            .flat_map(|e| LogicName::ALL.into_iter().map(move |l| expected_keys(e, 2, l, FieldScope::Core).len()))
            .sum::<usize>();
        assert_eq!(report.errors().len(), per_group);
    }

    #[test]
    fn test_engine_subset() {
        let setfile = parse_setfile("gInput_MaxPowerOrdersC=10\n");
        let report = validate_parity(&setfile, &[EngineId::C], 0);
        assert!(report.passed());
        assert_eq!(report.checked(), 1);
    }

    #[test]
    fn test_duplicate_keys_warn() {
        let text = format!("{}gInput_MaxPowerOrders=12\n", generated(1));
        let report = ParityValidator::new(1).validate(&parse_setfile(&text));
        assert!(report.passed());
        assert_eq!(report.warnings().len(), 1);
    }
}
