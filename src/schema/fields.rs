//! Field tables
//!
//! Each field declares its document name, the token it contributes to
//! its flat key, the naming template that places that token, its value
//! format, and whether the structural validator requires it. The
//! template is part of the table. It is never derived from the name.

use std::borrow::Cow;

use super::codes::CodeTable;
use super::errors::{SchemaError, SchemaResult};
use super::types::{EntityKind, FieldContext, GroupVariant, LogicVariant};

/// Where a field's token sits in its flat key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingTemplate {
    /// `gInput_<Token>_<suffix>`
    Suffixed,
    /// `gInput_<suffix>_<Token>`
    SuffixLeading,
    /// `gInput_G<group>_<Token>_<short>`
    GroupLeading,
    /// `gInput_G<group>_<short>_<Token>`
    GroupTrailing,
    /// `gInput_G<group>_Scale_<short>_<Token>`
    GroupScale,
    /// `gInput_Group<group>_<Token>`
    GroupControl,
    /// `gInput_<Token><prefix>`
    EngineTrailing,
}

/// Serialized form of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFormat {
    Bool,
    Int,
    /// Fixed number of decimals
    Fixed(u8),
    Code(CodeTable),
    Text,
}

/// Value used when an optional or extension field is absent from the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Bool(bool),
    Int(i64),
    Float(f64),
    Label(&'static str),
}

/// Which keys a caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldScope {
    /// Required, conditional, optional and extension fields
    #[default]
    Full,
    /// Required and conditional fields only
    Core,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub token: &'static str,
    pub naming: NamingTemplate,
    pub format: ValueFormat,
    pub required: bool,
    pub fallback: Option<Fallback>,
}

const fn required(
    name: &'static str,
    token: &'static str,
    naming: NamingTemplate,
    format: ValueFormat,
) -> FieldSpec {
    FieldSpec {
        name,
        token,
        naming,
        format,
        required: true,
        fallback: None,
    }
}

const fn optional(
    name: &'static str,
    token: &'static str,
    naming: NamingTemplate,
    format: ValueFormat,
    fallback: Fallback,
) -> FieldSpec {
    FieldSpec {
        name,
        token,
        naming,
        format,
        required: false,
        fallback: Some(fallback),
    }
}

use NamingTemplate::*;

const LOT: ValueFormat = ValueFormat::Fixed(2);
const MAGNITUDE: ValueFormat = ValueFormat::Fixed(1);
const SCALE: ValueFormat = ValueFormat::Fixed(2);

/// Engine fields the structural validator requires
pub const ENGINE_REQUIRED_FIELDS: &[&str] = &["engine_id", "engine_name", "max_power_orders", "groups"];

/// Engine fields with a flat key
pub const ENGINE_FLAT_FIELDS: &[FieldSpec] = &[required(
    "max_power_orders",
    "MaxPowerOrders",
    EngineTrailing,
    ValueFormat::Int,
)];

/// Group fields the structural validator requires
pub const GROUP_REQUIRED_FIELDS: &[&str] = &[
    "group_number",
    "enabled",
    "reverse_mode",
    "hedge_mode",
    "hedge_reference",
    "entry_delay_bars",
    "logics",
];

/// Group fields with a flat key, emitted once per group number
pub const GROUP_FLAT_FIELDS: &[FieldSpec] = &[
    required("reverse_mode", "ReverseMode", GroupControl, ValueFormat::Bool),
    required("hedge_mode", "HedgeMode", GroupControl, ValueFormat::Bool),
    required("hedge_reference", "HedgeReference", GroupControl, ValueFormat::Text),
    required("entry_delay_bars", "EntryDelayBars", GroupControl, ValueFormat::Int),
];

/// Logic identity fields. Required in documents, never flattened.
pub const LOGIC_IDENTITY_FIELDS: &[&str] = &["logic_name", "logic_id"];

/// Fields every logic carries, in canonical order
pub const BASE_LOGIC_FIELDS: &[FieldSpec] = &[
    required("enabled", "Start", Suffixed, ValueFormat::Bool),
    required("initial_lot", "Initial_loT", Suffixed, LOT),
    required("multiplier", "Mult", Suffixed, LOT),
    required("grid", "Grid", Suffixed, MAGNITUDE),
    required("trail_method", "Trail", Suffixed, ValueFormat::Code(CodeTable::TrailMethod)),
    required("trail_value", "TrailValue", Suffixed, MAGNITUDE),
    required("trail_start", "Trail_Start", Suffixed, MAGNITUDE),
    required("trail_step", "TrailStep", Suffixed, MAGNITUDE),
    required("trail_step_method", "TrailStepMethod", Suffixed, ValueFormat::Code(CodeTable::TrailStepMethod)),
    required("trail_step_mode", "TrailStepMode", Suffixed, ValueFormat::Code(CodeTable::TrailStepMode)),
    required("trail_step_cycle", "TrailStepCycle", Suffixed, ValueFormat::Int),
    required("trail_step_balance", "TrailStepBalance", Suffixed, ValueFormat::Fixed(2)),
    required("close_targets", "CloseTargets", Suffixed, ValueFormat::Text),
    required("order_count_reference", "OrderCountReference", SuffixLeading, ValueFormat::Text),
    required("reset_lot_on_restart", "ResetLotOnRestart", Suffixed, ValueFormat::Bool),
    required("use_tp", "UseTP", GroupLeading, ValueFormat::Bool),
    required("tp_mode", "TP_Mode", GroupLeading, ValueFormat::Code(CodeTable::TpslMode)),
    required("tp_value", "TP_Value", GroupLeading, MAGNITUDE),
    required("use_sl", "UseSL", GroupLeading, ValueFormat::Bool),
    required("sl_mode", "SL_Mode", GroupLeading, ValueFormat::Code(CodeTable::TpslMode)),
    required("sl_value", "SL_Value", GroupLeading, MAGNITUDE),
    required("reverse_enabled", "ReverseEnabled", GroupTrailing, ValueFormat::Bool),
    required("hedge_enabled", "HedgeEnabled", GroupTrailing, ValueFormat::Bool),
    required("reverse_scale", "Reverse", GroupScale, SCALE),
    required("hedge_scale", "Hedge", GroupScale, SCALE),
    required("reverse_reference", "ReverseReference", GroupTrailing, ValueFormat::Text),
    required("hedge_reference", "HedgeReference", GroupTrailing, ValueFormat::Text),
    required("close_partial", "ClosePartial", Suffixed, ValueFormat::Bool),
    required("close_partial_cycle", "ClosePartialCycle", Suffixed, ValueFormat::Int),
    required("close_partial_mode", "ClosePartialMode", Suffixed, ValueFormat::Code(CodeTable::PartialMode)),
    required("close_partial_balance", "ClosePartialBalance", Suffixed, ValueFormat::Code(CodeTable::PartialBalance)),
    required(
        "close_partial_trail_step_mode",
        "ClosePartialTrailStepMode",
        Suffixed,
        ValueFormat::Code(CodeTable::TrailStepMode),
    ),
    optional("allow_buy", "AllowBuy", Suffixed, ValueFormat::Bool, Fallback::Bool(true)),
    optional("allow_sell", "AllowSell", Suffixed, ValueFormat::Bool, Fallback::Bool(true)),
    optional("strategy_type", "StrategyType", GroupTrailing, ValueFormat::Text, Fallback::Label("Trail")),
    optional("trading_mode", "TradingMode", GroupTrailing, ValueFormat::Text, Fallback::Label("Trending")),
];

/// Extra fields for every logic except Power
pub const STANDARD_LOGIC_FIELDS: &[FieldSpec] = &[
    required("start_level", "StartLevel", Suffixed, ValueFormat::Int),
    required("last_lot", "LastLot", Suffixed, LOT),
];

/// Entry-trigger fields, group 1 only
pub const FIRST_GROUP_FIELDS: &[FieldSpec] = &[
    required("trigger_type", "TriggerType", GroupLeading, ValueFormat::Code(CodeTable::TriggerType)),
    required("trigger_bars", "TriggerBars", GroupLeading, ValueFormat::Int),
    required("trigger_minutes", "TriggerMinutes", GroupLeading, ValueFormat::Int),
    optional("trigger_pips", "TriggerPips", GroupLeading, MAGNITUDE, Fallback::Float(0.0)),
];

/// Trail-step slot fields. Slot `n` appends `_n` to the name and `n` to the token.
pub const TRAIL_STEP_SLOT_FIELDS: &[FieldSpec] = &[
    optional("trail_step", "TrailStep", Suffixed, MAGNITUDE, Fallback::Float(1500.0)),
    optional(
        "trail_step_method",
        "TrailStepMethod",
        Suffixed,
        ValueFormat::Code(CodeTable::TrailStepMethod),
        Fallback::Label("Step_Points"),
    ),
    optional(
        "trail_step_mode",
        "TrailStepMode",
        Suffixed,
        ValueFormat::Code(CodeTable::TrailStepMode),
        Fallback::Label("TrailStepMode_Auto"),
    ),
    optional("trail_step_cycle", "TrailStepCycle", Suffixed, ValueFormat::Int, Fallback::Int(1)),
    optional("trail_step_balance", "TrailStepBalance", Suffixed, ValueFormat::Fixed(2), Fallback::Float(0.0)),
];

pub const TRAIL_STEP_SLOTS: std::ops::RangeInclusive<u8> = 2..=7;

/// Close-partial slot fields. Slot 1 lives in the base set.
pub const CLOSE_PARTIAL_SLOT_FIELDS: &[FieldSpec] = &[
    optional("close_partial", "ClosePartial", Suffixed, ValueFormat::Bool, Fallback::Bool(false)),
    optional("close_partial_cycle", "ClosePartialCycle", Suffixed, ValueFormat::Int, Fallback::Int(3)),
    optional(
        "close_partial_mode",
        "ClosePartialMode",
        Suffixed,
        ValueFormat::Code(CodeTable::PartialMode),
        Fallback::Label("PartialMode_Low"),
    ),
    optional(
        "close_partial_balance",
        "ClosePartialBalance",
        Suffixed,
        ValueFormat::Code(CodeTable::PartialBalance),
        Fallback::Label("PartialBalance_Balanced"),
    ),
];

pub const CLOSE_PARTIAL_SLOTS: std::ops::RangeInclusive<u8> = 2..=4;

/// A field bound to its concrete document name and flat token
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: Cow<'static, str>,
    pub token: Cow<'static, str>,
    pub spec: &'static FieldSpec,
}

impl ResolvedField {
    fn base(spec: &'static FieldSpec) -> Self {
        Self {
            name: Cow::Borrowed(spec.name),
            token: Cow::Borrowed(spec.token),
            spec,
        }
    }

    fn slot(spec: &'static FieldSpec, slot: u8) -> Self {
        Self {
            name: Cow::Owned(format!("{}_{}", spec.name, slot)),
            token: Cow::Owned(format!("{}{}", spec.token, slot)),
            spec,
        }
    }

    pub fn naming(&self) -> NamingTemplate {
        self.spec.naming
    }

    pub fn format(&self) -> ValueFormat {
        self.spec.format
    }

    pub fn is_required(&self) -> bool {
        self.spec.required
    }
}

/// Returns the field names an entity must carry
///
/// The context only matters for logics; engines and groups have a
/// single field set.
pub fn required_fields(kind: EntityKind, ctx: FieldContext) -> Vec<&'static str> {
    match kind {
        EntityKind::Engine => ENGINE_REQUIRED_FIELDS.to_vec(),
        EntityKind::Group => GROUP_REQUIRED_FIELDS.to_vec(),
        EntityKind::Logic => {
            let mut fields: Vec<&'static str> = LOGIC_IDENTITY_FIELDS.to_vec();
            fields.extend(
                conditional_sets(ctx)
                    .into_iter()
                    .flatten()
                    .filter(|spec| spec.required)
                    .map(|spec| spec.name),
            );
            fields
        }
    }
}

fn conditional_sets(ctx: FieldContext) -> Vec<&'static [FieldSpec]> {
    let mut sets = vec![BASE_LOGIC_FIELDS];
    if ctx.logic == LogicVariant::Standard {
        sets.push(STANDARD_LOGIC_FIELDS);
    }
    if ctx.group == GroupVariant::First {
        sets.push(FIRST_GROUP_FIELDS);
    }
    sets
}

/// Flattenable logic fields in canonical order for the given context
pub fn logic_fields(ctx: FieldContext, scope: FieldScope) -> Vec<ResolvedField> {
    let mut fields: Vec<ResolvedField> = conditional_sets(ctx)
        .into_iter()
        .flatten()
        .filter(|spec| scope == FieldScope::Full || spec.required)
        .map(ResolvedField::base)
        .collect();

    if scope == FieldScope::Full {
        for slot in TRAIL_STEP_SLOTS {
            fields.extend(TRAIL_STEP_SLOT_FIELDS.iter().map(|spec| ResolvedField::slot(spec, slot)));
        }
        for slot in CLOSE_PARTIAL_SLOTS {
            fields.extend(CLOSE_PARTIAL_SLOT_FIELDS.iter().map(|spec| ResolvedField::slot(spec, slot)));
        }
    }

    fields
}

/// Looks up a single flattenable logic field by document name
pub fn find_logic_field(ctx: FieldContext, name: &str) -> SchemaResult<ResolvedField> {
    logic_fields(ctx, FieldScope::Full)
        .into_iter()
        .find(|field| field.name == name)
        .ok_or_else(|| SchemaError::mismatch(EntityKind::Logic, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(logic: LogicVariant, group: GroupVariant) -> FieldContext {
        FieldContext::new(logic, group)
    }

    #[test]
    fn test_base_required_logic_fields() {
        let fields = required_fields(
            EntityKind::Logic,
            ctx(LogicVariant::Power, GroupVariant::Subsequent),
        );
        assert_eq!(fields.len(), 34);
        assert_eq!(&fields[..2], &["logic_name", "logic_id"]);
        assert!(fields.contains(&"close_partial_trail_step_mode"));
        assert!(!fields.contains(&"allow_buy"));
    }

    #[test]
    fn test_power_does_not_require_level_fields() {
        let fields = required_fields(EntityKind::Logic, ctx(LogicVariant::Power, GroupVariant::First));
        assert!(!fields.contains(&"start_level"));
        assert!(!fields.contains(&"last_lot"));
    }

    #[test]
    fn test_standard_requires_level_fields() {
        let fields = required_fields(
            EntityKind::Logic,
            ctx(LogicVariant::Standard, GroupVariant::Subsequent),
        );
        assert!(fields.contains(&"start_level"));
        assert!(fields.contains(&"last_lot"));
    }

    #[test]
    fn test_trigger_fields_only_in_first_group() {
        let first = required_fields(EntityKind::Logic, ctx(LogicVariant::Standard, GroupVariant::First));
        let later = required_fields(
            EntityKind::Logic,
            ctx(LogicVariant::Standard, GroupVariant::Subsequent),
        );
        for field in ["trigger_type", "trigger_bars", "trigger_minutes"] {
            assert!(first.contains(&field));
            assert!(!later.contains(&field));
        }
        assert!(!first.contains(&"trigger_pips"));
    }

    #[test]
    fn test_group_and_engine_required_fields() {
        let any = ctx(LogicVariant::Power, GroupVariant::First);
        assert_eq!(required_fields(EntityKind::Group, any).len(), 7);
        assert_eq!(
            required_fields(EntityKind::Engine, any),
            vec!["engine_id", "engine_name", "max_power_orders", "groups"]
        );
    }

    #[test]
    fn test_full_scope_adds_slots() {
        let c = ctx(LogicVariant::Standard, GroupVariant::Subsequent);
        let core = logic_fields(c, FieldScope::Core);
        let full = logic_fields(c, FieldScope::Full);
        // 4 optional base fields, 6 trail-step slots of 5, 3 close-partial slots of 4
        assert_eq!(full.len(), core.len() + 4 + 30 + 12);

        let slot = full.iter().find(|f| f.name == "trail_step_balance_7").unwrap();
        assert_eq!(slot.token, "TrailStepBalance7");
        assert_eq!(slot.format(), ValueFormat::Fixed(2));
    }

    #[test]
    fn test_field_names_are_unique_per_context() {
        let c = ctx(LogicVariant::Standard, GroupVariant::First);
        let fields = logic_fields(c, FieldScope::Full);
        let mut names: Vec<&str> = fields.iter().map(|f| &*f.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), fields.len());
    }

    #[test]
    fn test_unknown_field_is_schema_mismatch() {
        let c = ctx(LogicVariant::Power, GroupVariant::Subsequent);
        let err = find_logic_field(c, "start_level").unwrap_err();
        assert_eq!(err.code(), "SETPARITY_SCHEMA_MISMATCH");
        assert!(find_logic_field(c, "tp_value").is_ok());
    }
}
