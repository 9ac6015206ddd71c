//! Hierarchical configuration document
//!
//! Field names match the document keys the schema tables use, so a
//! logic's serde representation can be walked field by field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{EngineId, LogicName};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub engines: Vec<Engine>,
}

impl Document {
    pub fn engine(&self, id: EngineId) -> Option<&Engine> {
        self.engines.iter().find(|e| e.engine_id == id)
    }

    /// Group count of the first engine, 0 for an empty document
    pub fn group_count(&self) -> u32 {
        self.engines
            .first()
            .map(|e| e.groups.len() as u32)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    pub engine_id: EngineId,
    pub engine_name: String,
    pub max_power_orders: i64,
    pub groups: Vec<Group>,
}

impl Engine {
    pub fn group(&self, number: u32) -> Option<&Group> {
        self.groups.iter().find(|g| g.group_number == number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_number: u32,
    pub enabled: bool,
    pub reverse_mode: bool,
    pub hedge_mode: bool,
    pub hedge_reference: String,
    pub entry_delay_bars: i64,
    pub logics: Vec<Logic>,
}

impl Group {
    pub fn logic(&self, name: LogicName) -> Option<&Logic> {
        self.logics.iter().find(|l| l.logic_name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logic {
    pub logic_name: LogicName,
    pub logic_id: String,
    pub enabled: bool,

    // Sizing and grid
    pub initial_lot: f64,
    pub multiplier: f64,
    pub grid: f64,

    // Trail
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

    // TP/SL
    pub use_tp: bool,
    pub tp_mode: String,
    pub tp_value: f64,
    pub use_sl: bool,
    pub sl_mode: String,
    pub sl_value: f64,

    // Reverse/Hedge
    pub reverse_enabled: bool,
    pub hedge_enabled: bool,
    pub reverse_scale: f64,
    pub hedge_scale: f64,
    pub reverse_reference: String,
    pub hedge_reference: String,

    // Close partial, slot 1
    pub close_partial: bool,
    pub close_partial_cycle: i64,
    pub close_partial_mode: String,
    pub close_partial_balance: String,
    pub close_partial_trail_step_mode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_buy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_sell: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_mode: Option<String>,

    // Every logic except Power
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_lot: Option<f64>,

    // Group 1 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_bars: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_pips: Option<f64>,

    /// Trail-step slots 2..7 and close-partial slots 2..4, keyed by
    /// document name (`trail_step_3`, `close_partial_mode_2`, ...)
    #[serde(flatten)]
    pub extended: BTreeMap<String, Value>,
}
