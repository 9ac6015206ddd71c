//! CLI module for setparity
//!
//! Provides command-line interface for:
//! - generate: Build a document from config and encode it
//! - export: Encode an existing document
//! - import: Rebuild a document from a setfile
//! - validate-structure / validate-parity: Run the validators
//! - keys: List the flat keys of one logic

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, OutputFormat};
pub use commands::{
    export, generate, import, keys, run_command, validate_parity_cmd, validate_structure_cmd,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{render_report, write_report, write_response};

use crate::observability::{init_logging, LogFormat};

/// Parse arguments, install logging and run the command
///
/// Returns the process exit status.
pub fn run() -> CliResult<i32> {
    let cli = Cli::parse_args();

    let log_format = match cli.format {
        OutputFormat::Json => LogFormat::Json,
        OutputFormat::Text => LogFormat::Text,
    };
    // Logging is never required for a correct result
    if let Err(e) = init_logging(&cli.log_level, log_format) {
        eprintln!("{}", e);
    }

    run_command(cli.command, cli.format)
}
