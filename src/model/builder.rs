//! Builds a fully populated document from a generator configuration

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{json, Value};

use crate::schema::{EngineId, LogicName, LogicVariant, CLOSE_PARTIAL_SLOTS, TRAIL_STEP_SLOTS};

use super::config::{GeneratorConfig, GroupDefaults, LogicDefaults};
use super::types::{Document, Engine, Group, Logic};

/// Builds the complete engine × group × logic document
///
/// The config is expected to have passed `validate()`.
pub fn build_document(config: &GeneratorConfig) -> Document {
    let engines = config
        .engines
        .iter()
        .map(|&engine_id| Engine {
            engine_id,
            engine_name: format!("Engine {}", engine_id),
            max_power_orders: config.max_power_orders,
            groups: (1..=config.group_count)
                .map(|number| build_group(engine_id, number, &config.group_defaults, &config.logic_defaults))
                .collect(),
        })
        .collect();

    Document {
        version: config.version.clone(),
        platform: config.platform.clone(),
        timestamp: Some(Utc::now().to_rfc3339()),
        engines,
    }
}

fn build_group(engine: EngineId, number: u32, group: &GroupDefaults, logic: &LogicDefaults) -> Group {
    Group {
        group_number: number,
        enabled: group.enabled,
        reverse_mode: group.reverse_mode,
        hedge_mode: group.hedge_mode,
        hedge_reference: group.hedge_reference.clone(),
        entry_delay_bars: group.entry_delay_bars,
        logics: LogicName::ALL
            .iter()
            .map(|&name| build_logic(engine, number, name, logic))
            .collect(),
    }
}

/// Builds one logic from defaults, filling exactly the conditional
/// fields its variant and group call for
pub fn build_logic(engine: EngineId, group: u32, name: LogicName, d: &LogicDefaults) -> Logic {
    let standard = name.variant() == LogicVariant::Standard;
    let first_group = group == 1;

    Logic {
        logic_name: name,
        logic_id: name.logic_id(engine, group),
        enabled: d.enabled,
        initial_lot: d.initial_lot,
        multiplier: d.multiplier,
        grid: d.grid,
        trail_method: d.trail_method.clone(),
        trail_value: d.trail_value,
        trail_start: d.trail_start,
        trail_step: d.trail_step,
        trail_step_method: d.trail_step_method.clone(),
        trail_step_mode: d.trail_step_mode.clone(),
        trail_step_cycle: d.trail_step_cycle,
        trail_step_balance: d.trail_step_balance,
        close_targets: d.close_targets.clone(),
        order_count_reference: d.order_count_reference.clone(),
        reset_lot_on_restart: d.reset_lot_on_restart,
        use_tp: d.use_tp,
        tp_mode: d.tp_mode.clone(),
        tp_value: d.tp_value,
        use_sl: d.use_sl,
        sl_mode: d.sl_mode.clone(),
        sl_value: d.sl_value,
        reverse_enabled: d.reverse_enabled,
        hedge_enabled: d.hedge_enabled,
        reverse_scale: d.reverse_scale,
        hedge_scale: d.hedge_scale,
        reverse_reference: d.reverse_reference.clone(),
        hedge_reference: d.hedge_reference.clone(),
        close_partial: d.close_partial,
        close_partial_cycle: d.close_partial_cycle,
        close_partial_mode: d.close_partial_mode.clone(),
        close_partial_balance: d.close_partial_balance.clone(),
        close_partial_trail_step_mode: d.close_partial_trail_step_mode.clone(),
        allow_buy: Some(d.allow_buy),
        allow_sell: Some(d.allow_sell),
        strategy_type: Some(d.strategy_type.clone()),
        trading_mode: Some(d.trading_mode.clone()),
        start_level: standard.then_some(d.start_level),
        last_lot: standard.then_some(d.last_lot),
        trigger_type: first_group.then(|| d.trigger_type.clone()),
        trigger_bars: first_group.then_some(d.trigger_bars),
        trigger_minutes: first_group.then_some(d.trigger_minutes),
        trigger_pips: first_group.then_some(d.trigger_pips),
        extended: extension_slots(d),
    }
}

fn extension_slots(d: &LogicDefaults) -> BTreeMap<String, Value> {
    let mut slots = BTreeMap::new();

    for n in TRAIL_STEP_SLOTS {
        slots.insert(format!("trail_step_{}", n), json!(d.trail_step));
        slots.insert(format!("trail_step_method_{}", n), json!(d.trail_step_method));
        slots.insert(format!("trail_step_mode_{}", n), json!(d.trail_step_mode));
        slots.insert(format!("trail_step_cycle_{}", n), json!(d.trail_step_cycle));
        slots.insert(format!("trail_step_balance_{}", n), json!(d.trail_step_balance));
    }

    for n in CLOSE_PARTIAL_SLOTS {
        slots.insert(format!("close_partial_{}", n), json!(d.close_partial));
        slots.insert(format!("close_partial_cycle_{}", n), json!(d.close_partial_cycle));
        slots.insert(format!("close_partial_mode_{}", n), json!(d.close_partial_mode));
        slots.insert(format!("close_partial_balance_{}", n), json!(d.close_partial_balance));
    }

    slots
}
