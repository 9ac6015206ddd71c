//! Per-field value formatting
//!
//! Booleans are `1`/`0` in setfiles and JSON booleans in documents.
//! Decimals use the fixed precision declared by the field.

use serde_json::{json, Value};

use crate::schema::{CodeTable, Fallback, SchemaError, SchemaResult, ValueFormat};

#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Bool(bool),
    Int(i64),
    Fixed { value: f64, decimals: u8 },
    Code { table: CodeTable, code: i64 },
    Text(String),
}

impl FlatValue {
    /// Converts a document value into its flat form
    ///
    /// `path` and `field` only feed the error message.
    pub fn from_json(value: &Value, format: ValueFormat, path: &str, field: &str) -> SchemaResult<Self> {
        let invalid = || SchemaError::invalid(path, field, value);
        match format {
            ValueFormat::Bool => value.as_bool().map(FlatValue::Bool).ok_or_else(invalid),
            ValueFormat::Int => value.as_i64().map(FlatValue::Int).ok_or_else(invalid),
            ValueFormat::Fixed(decimals) => value
                .as_f64()
                .map(|value| FlatValue::Fixed { value, decimals })
                .ok_or_else(invalid),
            ValueFormat::Code(table) => {
                let code = match value {
                    Value::String(label) => table.encode(label)?,
                    Value::Number(n) => n.as_i64().ok_or_else(invalid)?,
                    _ => return Err(invalid()),
                };
                Ok(FlatValue::Code { table, code })
            }
            ValueFormat::Text => value
                .as_str()
                .map(|s| FlatValue::Text(s.to_string()))
                .ok_or_else(invalid),
        }
    }

    /// Value for an optional field the document leaves out
    pub fn from_fallback(fallback: Fallback, format: ValueFormat) -> SchemaResult<Self> {
        let value = match fallback {
            Fallback::Bool(b) => json!(b),
            Fallback::Int(i) => json!(i),
            Fallback::Float(f) => json!(f),
            Fallback::Label(s) => json!(s),
        };
        Self::from_json(&value, format, "default", "fallback")
    }

    /// Parses a raw setfile value
    pub fn parse_flat(raw: &str, format: ValueFormat, key: &str) -> SchemaResult<Self> {
        let raw = raw.trim();
        let invalid = || SchemaError::invalid(key, "value", format!("'{}'", raw));
        match format {
            ValueFormat::Bool => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(FlatValue::Bool(true)),
                "0" | "false" => Ok(FlatValue::Bool(false)),
                _ => Err(invalid()),
            },
            ValueFormat::Int => raw.parse().map(FlatValue::Int).map_err(|_| invalid()),
            ValueFormat::Fixed(decimals) => raw
                .parse()
                .map(|value| FlatValue::Fixed { value, decimals })
                .map_err(|_| invalid()),
            ValueFormat::Code(table) => raw
                .parse()
                .map(|code| FlatValue::Code { table, code })
                .map_err(|_| invalid()),
            ValueFormat::Text => Ok(FlatValue::Text(raw.to_string())),
        }
    }

    /// Setfile form
    pub fn render_flat(&self) -> String {
        match self {
            FlatValue::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
            FlatValue::Int(i) => i.to_string(),
            FlatValue::Fixed { value, decimals } => format!("{:.*}", *decimals as usize, value),
            FlatValue::Code { code, .. } => code.to_string(),
            FlatValue::Text(s) => s.clone(),
        }
    }

    /// Document form. Codes map back to their canonical label; a code
    /// without a label stays numeric.
    pub fn to_json(&self) -> Value {
        match self {
            FlatValue::Bool(b) => json!(b),
            FlatValue::Int(i) => json!(i),
            FlatValue::Fixed { value, .. } => json!(value),
            FlatValue::Code { table, code } => match table.decode(*code) {
                Some(label) => json!(label),
                None => json!(code),
            },
            FlatValue::Text(s) => json!(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_renders_as_digit() {
        let v = FlatValue::from_json(&json!(true), ValueFormat::Bool, "p", "f").unwrap();
        assert_eq!(v.render_flat(), "1");
        assert_eq!(v.to_json(), json!(true));
        let v = FlatValue::from_json(&json!(false), ValueFormat::Bool, "p", "f").unwrap();
        assert_eq!(v.render_flat(), "0");
    }

    #[test]
    fn test_fixed_precision() {
        let lot = FlatValue::from_json(&json!(0.02), ValueFormat::Fixed(2), "p", "f").unwrap();
        assert_eq!(lot.render_flat(), "0.02");
        let mult = FlatValue::from_json(&json!(1.2), ValueFormat::Fixed(2), "p", "f").unwrap();
        assert_eq!(mult.render_flat(), "1.20");
        let grid = FlatValue::from_json(&json!(300), ValueFormat::Fixed(1), "p", "f").unwrap();
        assert_eq!(grid.render_flat(), "300.0");
    }

    #[test]
    fn test_code_encoding() {
        let v = FlatValue::from_json(
            &json!("TrailStepMode_Disabled"),
            ValueFormat::Code(CodeTable::TrailStepMode),
            "p",
            "f",
        )
        .unwrap();
        assert_eq!(v.render_flat(), "4");
        assert_eq!(v.to_json(), json!("TrailStepMode_Disabled"));
    }

    #[test]
    fn test_wrong_type_is_invalid_value() {
        let err = FlatValue::from_json(&json!("yes"), ValueFormat::Bool, "Engine A Group 1 Power", "use_tp")
            .unwrap_err();
        assert_eq!(err.code(), "SETPARITY_INVALID_VALUE");
        assert!(err.to_string().contains("use_tp"));
    }

    #[test]
    fn test_parse_flat_accepts_both_boolean_spellings() {
        assert_eq!(FlatValue::parse_flat("1", ValueFormat::Bool, "k").unwrap(), FlatValue::Bool(true));
        assert_eq!(FlatValue::parse_flat("false", ValueFormat::Bool, "k").unwrap(), FlatValue::Bool(false));
        assert!(FlatValue::parse_flat("2", ValueFormat::Bool, "k").is_err());
    }

    #[test]
    fn test_unlabelled_code_stays_numeric() {
        let v = FlatValue::parse_flat("9", ValueFormat::Code(CodeTable::TrailMethod), "k").unwrap();
        assert_eq!(v.to_json(), json!(9));
    }

    #[test]
    fn test_fallback() {
        let v = FlatValue::from_fallback(Fallback::Label("Step_Points"), ValueFormat::Code(CodeTable::TrailStepMethod))
            .unwrap();
        assert_eq!(v.render_flat(), "0");
    }
}
