//! setparity CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Fatal errors are
//! printed to stderr; the exit status is 0 when validation found no
//! errors and 1 otherwise.

use setparity::cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
