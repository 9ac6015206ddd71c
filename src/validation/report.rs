//! Validation findings and reports
//!
//! Findings accumulate. Nothing here aborts; a report only decides pass
//! or fail once every finding is in.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    /// Required field or entity missing
    StructuralError,
    /// Cardinality or identity deviation
    StructuralWarning,
    /// Expected flat key absent
    ParityError,
    /// Setfile oddity that does not hide keys
    ParityWarning,
    /// Boolean not in its canonical form
    CoercionWarning,
}

impl FindingKind {
    pub fn is_error(&self) -> bool {
        matches!(self, FindingKind::StructuralError | FindingKind::ParityError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Entity path, e.g. `Engine A Group 3 Stopper`
    pub path: String,
    /// Offending field or flat key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        let path = path.into();
        let field = field.into();
        Self {
            kind: FindingKind::StructuralError,
            message: format!("{}: Missing field '{}'", path, field),
            path,
            field: Some(field),
        }
    }

    pub fn not_an_array(path: impl Into<String>, field: impl Into<String>) -> Self {
        let path = path.into();
        let field = field.into();
        Self {
            kind: FindingKind::StructuralError,
            message: format!("{}: Field '{}' is not an array", path, field),
            path,
            field: Some(field),
        }
    }

    pub fn missing_key(path: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            kind: FindingKind::ParityError,
            message: format!("Missing key: {}", key),
            path: path.into(),
            field: Some(key),
        }
    }

    pub fn structural_warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::StructuralWarning,
            path: path.into(),
            field: None,
            message: message.into(),
        }
    }

    pub fn parity_warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::ParityWarning,
            path: path.into(),
            field: None,
            message: message.into(),
        }
    }

    pub fn coercion_warning(path: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::CoercionWarning,
            path: path.into(),
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Ordered errors and warnings from one or more checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    /// Entities or keys examined
    checked: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        if finding.kind.is_error() {
            self.errors.push(finding);
        } else {
            self.warnings.push(finding);
        }
    }

    pub fn record_checked(&mut self, count: usize) {
        self.checked += count;
    }

    /// Appends another report's findings after this one's
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.checked += other.checked;
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn checked(&self) -> usize {
        self.checked
    }

    /// Warnings never fail a report
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "passed": self.passed(),
            "checked": self.checked,
            "error_count": self.errors.len(),
            "warning_count": self.warnings.len(),
            "errors": self.errors,
            "warnings": self.warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_route_by_kind() {
        let mut report = ValidationReport::new();
        report.push(Finding::missing_field("Engine A Group 1 Power", "grid"));
        report.push(Finding::structural_warning("Engine B", "Engine B has 14 groups (expected 15)"));
        report.push(Finding::missing_key("Engine A Group 1 Power", "gInput_Grid_P1"));

        assert_eq!(report.errors().len(), 2);
        assert_eq!(report.warnings().len(), 1);
        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let mut report = ValidationReport::new();
        report.push(Finding::coercion_warning("Engine A", "k", "Non-canonical boolean"));
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Finding::missing_field("Engine A Group 3 Stopper", "last_lot").message,
            "Engine A Group 3 Stopper: Missing field 'last_lot'"
        );
        assert_eq!(
            Finding::missing_key("Engine B", "gInput_MaxPowerOrdersB").to_string(),
            "Missing key: gInput_MaxPowerOrdersB"
        );
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = ValidationReport::new();
        first.push(Finding::missing_field("a", "x"));
        let mut second = ValidationReport::new();
        second.push(Finding::missing_field("b", "y"));
        second.record_checked(3);

        first.merge(second);
        assert_eq!(first.errors()[0].path, "a");
        assert_eq!(first.errors()[1].path, "b");
        assert_eq!(first.checked(), 3);
    }

    #[test]
    fn test_json_shape() {
        let mut report = ValidationReport::new();
        report.push(Finding::missing_key("Group 2", "gInput_Group2_HedgeMode"));
        let json = report.to_json();
        assert_eq!(json["passed"], json!(false));
        assert_eq!(json["errors"][0]["kind"], json!("PARITY_ERROR"));
        assert_eq!(json["errors"][0]["field"], json!("gInput_Group2_HedgeMode"));
    }
}
