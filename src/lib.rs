//! setparity - schema-driven codec between hierarchical trading
//! configurations and flat `key=value` setfiles
//!
//! - `schema`: field tables, naming templates and code tables
//! - `model`: typed document and generator config
//! - `setfile`: encoder, decoder and importer
//! - `validation`: structural, parity and boolean checks

pub mod cli;
pub mod model;
pub mod observability;
pub mod schema;
pub mod setfile;
pub mod validation;
