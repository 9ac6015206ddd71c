//! CLI argument definitions using clap
//!
//! Commands:
//! - setparity generate --config <path>
//! - setparity export --document <path>
//! - setparity import --setfile <path>
//! - setparity validate-structure <document>
//! - setparity validate-parity <setfile>
//! - setparity keys --engine <id> --group <n> --logic <name>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::schema::{EngineId, LogicName, DEFAULT_GROUP_COUNT, MAX_GROUP_COUNT};

/// setparity - schema-driven setfile codec and parity validator
#[derive(Parser, Debug)]
#[command(name = "setparity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter directive (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Output format for results and logs
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a document from a generator config and encode it
    Generate {
        /// Path to generator config
        #[arg(long)]
        config: PathBuf,

        /// Setfile destination (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override the configured group count
        #[arg(long, value_parser = group_count_parser())]
        groups: Option<u32>,

        /// Write UTF-16LE with BOM instead of UTF-8 (with --output)
        #[arg(long)]
        utf16: bool,

        /// Also write the generated document here
        #[arg(long)]
        document: Option<PathBuf>,
    },

    /// Encode an existing document into a setfile
    Export {
        /// Path to hierarchical document
        #[arg(long)]
        document: PathBuf,

        /// Setfile destination (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write UTF-16LE with BOM instead of UTF-8 (with --output)
        #[arg(long)]
        utf16: bool,
    },

    /// Rebuild a document from a setfile
    Import {
        /// Path to setfile
        #[arg(long)]
        setfile: PathBuf,

        /// Group count (detected from group-level keys when omitted)
        #[arg(long, value_parser = group_count_parser())]
        groups: Option<u32>,

        /// Document destination (printed when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check a document for required fields and cardinality
    ValidateStructure {
        /// Path to hierarchical document
        document: PathBuf,

        /// Expected groups per engine
        #[arg(long, default_value_t = DEFAULT_GROUP_COUNT, value_parser = group_count_parser())]
        groups: u32,

        /// Also flag non-boolean values in boolean fields
        #[arg(long)]
        audit_booleans: bool,
    },

    /// Check a setfile for every key the schema expects
    ValidateParity {
        /// Path to setfile
        setfile: PathBuf,

        /// Expected groups per engine
        #[arg(long, default_value_t = DEFAULT_GROUP_COUNT, value_parser = group_count_parser())]
        groups: u32,

        /// Engines to check (default: A,B,C)
        #[arg(long, value_delimiter = ',')]
        engines: Option<Vec<EngineId>>,

        /// Only check required and conditional keys
        #[arg(long)]
        core_only: bool,

        /// Also flag boolean keys not written as 0/1
        #[arg(long)]
        audit_booleans: bool,
    },

    /// List the flat keys one logic contributes
    Keys {
        #[arg(long)]
        engine: EngineId,

        #[arg(long, value_parser = group_count_parser())]
        group: u32,

        #[arg(long)]
        logic: LogicName,

        /// Only required and conditional keys
        #[arg(long)]
        core_only: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Group counts and numbers run 1..=MAX_GROUP_COUNT
fn group_count_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_GROUP_COUNT))
}
