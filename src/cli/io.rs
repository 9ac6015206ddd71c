//! Output handling for CLI
//!
//! - JSON results: single object on stdout, `{"status": "ok", "data": ...}`
//! - Text results: one finding per line, then a summary line
//! - Logs never go to stdout

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use crate::validation::ValidationReport;

use super::args::OutputFormat;
use super::errors::{CliError, CliResult};

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain text to stdout as-is
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;

    Ok(())
}

/// Write a validation report in the requested format
pub fn write_report(report: &ValidationReport, format: OutputFormat, context: Value) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let mut data = report.to_json();
            if let (Some(data), Value::Object(context)) = (data.as_object_mut(), context) {
                data.extend(context);
            }
            write_response(data)
        }
        OutputFormat::Text => write_text(&render_report(report)),
    }
}

/// `ERROR:` / `WARNING:` lines followed by a PASSED or FAILED summary
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for error in report.errors() {
        out.push_str(&format!("ERROR: {}\n", error));
    }
    for warning in report.warnings() {
        out.push_str(&format!("WARNING: {}\n", warning));
    }

    let verdict = if report.passed() { "PASSED" } else { "FAILED" };
    out.push_str(&format!(
        "{} ({} checked, {} errors, {} warnings)\n",
        verdict,
        report.checked(),
        report.errors().len(),
        report.warnings().len()
    ));
    out
}

/// Read and parse a JSON document
pub fn read_json(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::document_error(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::document_error(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Write a JSON document, pretty-printed with a trailing newline
pub fn write_json_file(path: &Path, value: &Value) -> CliResult<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content)
        .map_err(|e| CliError::io_error(format!("Failed to write {}: {}", path.display(), e)))
}
