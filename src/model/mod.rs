//! Hierarchical document model
//!
//! Engines A/B/C, each with groups 1..N, each with the 7 canonical
//! logics. Documents are built once from a `GeneratorConfig` and are
//! not mutated afterwards.

mod builder;
mod config;
mod errors;
mod types;

pub use builder::{build_document, build_logic};
pub use config::{GeneratorConfig, GroupDefaults, LogicDefaults};
pub use errors::{ModelError, ModelResult};
pub use types::{Document, Engine, Group, Logic};
