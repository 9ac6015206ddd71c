//! Validation subsystem
//!
//! - `structural`: required fields and cardinality of a hierarchical document
//! - `parity`: every expected flat key present in a setfile
//! - `coercion`: booleans outside their canonical encoding
//!
//! All checks accumulate findings into a [`ValidationReport`]. Errors
//! fail a report; warnings never do.

mod coercion;
mod parity;
mod report;
mod structural;

pub use coercion::{audit_document_booleans, audit_flat_booleans};
pub use parity::{validate_parity, ParityValidator};
pub use report::{Finding, FindingKind, ValidationReport};
pub use structural::{validate_structure, StructuralValidator};
