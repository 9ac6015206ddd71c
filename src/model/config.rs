//! Generator configuration
//!
//! A JSON file whose every field is optional. Absent fields take the
//! defaults below, which match the stock V17.04 sample export.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::{CodeTable, EngineId, DEFAULT_GROUP_COUNT, MAX_GROUP_COUNT};

use super::errors::{ModelError, ModelResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_platform")]
    pub platform: String,

    /// Engines to generate, in output order
    #[serde(default = "default_engines")]
    pub engines: Vec<EngineId>,

    /// Groups per engine
    #[serde(default = "default_group_count")]
    pub group_count: u32,

    #[serde(default = "default_max_power_orders")]
    pub max_power_orders: i64,

    /// Write the `;` comment header at the top of the setfile
    #[serde(default = "default_true")]
    pub include_header: bool,

    #[serde(default)]
    pub group_defaults: GroupDefaults,

    #[serde(default)]
    pub logic_defaults: LogicDefaults,
}

fn default_version() -> String {
    "17.04".to_string()
}
fn default_platform() -> String {
    "MT4".to_string()
}
fn default_engines() -> Vec<EngineId> {
    EngineId::ALL.to_vec()
}
fn default_group_count() -> u32 {
    DEFAULT_GROUP_COUNT
}
fn default_max_power_orders() -> i64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            platform: default_platform(),
            engines: default_engines(),
            group_count: default_group_count(),
            max_power_orders: default_max_power_orders(),
            include_header: true,
            group_defaults: GroupDefaults::default(),
            logic_defaults: LogicDefaults::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ModelResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: GeneratorConfig = serde_json::from_str(&content).map_err(|source| ModelError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.group_count == 0 {
            return Err(ModelError::InvalidConfig("group_count must be > 0".into()));
        }

        if self.group_count > MAX_GROUP_COUNT {
            return Err(ModelError::InvalidConfig(format!(
                "group_count must be <= {}",
                MAX_GROUP_COUNT
            )));
        }

        if self.engines.is_empty() {
            return Err(ModelError::InvalidConfig("engines must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for engine in &self.engines {
            if !seen.insert(engine) {
                return Err(ModelError::InvalidConfig(format!("engine {} listed twice", engine)));
            }
        }

        if self.max_power_orders < 0 {
            return Err(ModelError::InvalidConfig("max_power_orders must be >= 0".into()));
        }

        self.logic_defaults.validate()
    }
}

/// Defaults applied to every generated group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDefaults {
    pub enabled: bool,
    pub reverse_mode: bool,
    pub hedge_mode: bool,
    pub hedge_reference: String,
    pub entry_delay_bars: i64,
}

impl Default for GroupDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            reverse_mode: false,
            hedge_mode: false,
            hedge_reference: "Logic_None".to_string(),
            entry_delay_bars: 0,
        }
    }
}

/// Defaults applied to every generated logic
///
/// Trail-step slots 2..7 copy the slot-1 trail step values, and
/// close-partial slots 2..4 copy the slot-1 close-partial values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicDefaults {
    pub enabled: bool,
    pub initial_lot: f64,
    pub multiplier: f64,
    pub grid: f64,
    pub trail_method: String,
    pub trail_value: f64,
    pub trail_start: f64,
    pub trail_step: f64,
    pub trail_step_method: String,
    pub trail_step_mode: String,
    pub trail_step_cycle: i64,
    pub trail_step_balance: f64,
    pub close_targets: String,
    pub order_count_reference: String,
    pub reset_lot_on_restart: bool,
    pub use_tp: bool,
    pub tp_mode: String,
    pub tp_value: f64,
    pub use_sl: bool,
    pub sl_mode: String,
    pub sl_value: f64,
    pub reverse_enabled: bool,
    pub hedge_enabled: bool,
    pub reverse_scale: f64,
    pub hedge_scale: f64,
    pub reverse_reference: String,
    pub hedge_reference: String,
    pub close_partial: bool,
    pub close_partial_cycle: i64,
    pub close_partial_mode: String,
    pub close_partial_balance: String,
    pub close_partial_trail_step_mode: String,
    pub allow_buy: bool,
    pub allow_sell: bool,
    pub strategy_type: String,
    pub trading_mode: String,
    pub start_level: i64,
    pub last_lot: f64,
    pub trigger_type: String,
    pub trigger_bars: i64,
    pub trigger_minutes: i64,
    pub trigger_pips: f64,
}

impl Default for LogicDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_lot: 0.02,
            multiplier: 1.2,
            grid: 300.0,
            trail_method: "Points".to_string(),
            trail_value: 3000.0,
            trail_start: 1.0,
            trail_step: 1500.0,
            trail_step_method: "Step_Points".to_string(),
            trail_step_mode: "TrailStepMode_Auto".to_string(),
            trail_step_cycle: 1,
            trail_step_balance: 0.0,
            close_targets: "1,2,3".to_string(),
            order_count_reference: "Logic_Self".to_string(),
            reset_lot_on_restart: false,
            use_tp: false,
            tp_mode: "TPSL_Points".to_string(),
            tp_value: 0.0,
            use_sl: false,
            sl_mode: "TPSL_Points".to_string(),
            sl_value: 0.0,
            reverse_enabled: false,
            hedge_enabled: false,
            reverse_scale: 100.0,
            hedge_scale: 50.0,
            reverse_reference: "Logic_None".to_string(),
            hedge_reference: "Logic_None".to_string(),
            close_partial: false,
            close_partial_cycle: 3,
            close_partial_mode: "PartialMode_Low".to_string(),
            close_partial_balance: "PartialBalance_Balanced".to_string(),
            close_partial_trail_step_mode: "TrailStepMode_Auto".to_string(),
            allow_buy: true,
            allow_sell: true,
            strategy_type: "Trail".to_string(),
            trading_mode: "Trending".to_string(),
            start_level: 4,
            last_lot: 0.12,
            trigger_type: "Trigger_Immediate".to_string(),
            trigger_bars: 3,
            trigger_minutes: 15,
            trigger_pips: 0.0,
        }
    }
}

impl LogicDefaults {
    /// Every enumeration label must resolve in its code table
    pub fn validate(&self) -> ModelResult<()> {
        let labelled = [
            (CodeTable::TrailMethod, &self.trail_method),
            (CodeTable::TrailStepMethod, &self.trail_step_method),
            (CodeTable::TrailStepMode, &self.trail_step_mode),
            (CodeTable::TpslMode, &self.tp_mode),
            (CodeTable::TpslMode, &self.sl_mode),
            (CodeTable::PartialMode, &self.close_partial_mode),
            (CodeTable::PartialBalance, &self.close_partial_balance),
            (CodeTable::TrailStepMode, &self.close_partial_trail_step_mode),
            (CodeTable::TriggerType, &self.trigger_type),
        ];
        for (table, label) in labelled {
            table.encode(label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("generator.json");
        fs::write(&path, "{}").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.group_count, 15);
        assert_eq!(config.engines, vec![EngineId::A, EngineId::B, EngineId::C]);
        assert_eq!(config.max_power_orders, 10);
        assert_eq!(config.logic_defaults.initial_lot, 0.02);
        assert_eq!(config.group_defaults.hedge_reference, "Logic_None");
        assert!(config.include_header);
    }

    #[test]
    fn test_partial_logic_defaults_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("generator.json");
        fs::write(
            &path,
            r#"{"group_count": 20, "engines": ["B"], "logic_defaults": {"grid": 450.0}}"#,
        )
        .unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.group_count, 20);
        assert_eq!(config.engines, vec![EngineId::B]);
        assert_eq!(config.logic_defaults.grid, 450.0);
        assert_eq!(config.logic_defaults.multiplier, 1.2);
    }

    #[test]
    fn test_config_rejects_zero_groups() {
        let config = GeneratorConfig {
            group_count: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_too_many_groups() {
        let config = GeneratorConfig {
            group_count: MAX_GROUP_COUNT + 1,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_duplicate_engine() {
        let config = GeneratorConfig {
            engines: vec![EngineId::A, EngineId::A],
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_unknown_label() {
        let mut config = GeneratorConfig::default();
        config.logic_defaults.tp_mode = "TPSL_Ticks".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "SETPARITY_UNKNOWN_CODE");
    }

    #[test]
    fn test_config_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = GeneratorConfig::load(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
