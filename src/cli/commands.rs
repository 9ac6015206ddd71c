//! CLI command implementations
//!
//! Every command returns the process exit status: 0 when no errors were
//! found, 1 otherwise. Warnings never change the status. Fatal failures
//! surface as `CliError` instead.

use std::path::Path;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::model::{build_document, Document, GeneratorConfig};
use crate::observability::{log_event, Event, ObservationScope};
use crate::schema::{EngineId, FieldScope, LogicName};
use crate::setfile::{
    encode_document, expected_keys, import_document, read_setfile, render_setfile, write_setfile, DecodedSetfile,
    ImportOptions, TextEncoding,
};
use crate::validation::{
    audit_document_booleans, audit_flat_booleans, validate_structure, ParityValidator, ValidationReport,
};

use super::args::{Command, OutputFormat};
use super::errors::{CliError, CliResult};
use super::io::{read_json, write_json_file, write_report, write_response, write_text};

/// Dispatch a parsed command
pub fn run_command(cmd: Command, format: OutputFormat) -> CliResult<i32> {
    match cmd {
        Command::Generate {
            config,
            output,
            groups,
            utf16,
            document,
        } => generate(&config, output.as_deref(), groups, utf16, document.as_deref()),
        Command::Export {
            document,
            output,
            utf16,
        } => export(&document, output.as_deref(), utf16, format),
        Command::Import {
            setfile,
            groups,
            output,
        } => import(&setfile, groups, output.as_deref()),
        Command::ValidateStructure {
            document,
            groups,
            audit_booleans,
        } => validate_structure_cmd(&document, groups, audit_booleans, format),
        Command::ValidateParity {
            setfile,
            groups,
            engines,
            core_only,
            audit_booleans,
        } => {
            let engines = engines.unwrap_or_else(|| EngineId::ALL.to_vec());
            validate_parity_cmd(&setfile, groups, &engines, core_only, audit_booleans, format)
        }
        Command::Keys {
            engine,
            group,
            logic,
            core_only,
        } => keys(engine, group, logic, core_only, format),
    }
}

/// Build a document from a generator config and encode it
pub fn generate(
    config_path: &Path,
    output: Option<&Path>,
    groups: Option<u32>,
    utf16: bool,
    document_path: Option<&Path>,
) -> CliResult<i32> {
    let scope = ObservationScope::new("GENERATE");

    let mut config = GeneratorConfig::load(config_path)?;
    if let Some(groups) = groups {
        config.group_count = groups;
        config.validate()?;
    }
    info!(
        event = Event::ConfigLoaded.as_str(),
        path = %config_path.display(),
        engines = config.engines.len(),
        groups = config.group_count,
    );

    let doc = build_document(&config);

    if let Some(path) = document_path {
        write_json_file(path, &serde_json::to_value(&doc)?)?;
        info!(event = Event::DocumentWritten.as_str(), path = %path.display());
    }

    emit_setfile(&doc, output, utf16, config.include_header)?;
    scope.complete();
    Ok(0)
}

/// Encode an existing document into a setfile
///
/// The document is structurally validated first; a document with
/// missing fields is reported instead of encoded.
pub fn export(document_path: &Path, output: Option<&Path>, utf16: bool, format: OutputFormat) -> CliResult<i32> {
    let scope = ObservationScope::new("EXPORT");

    let value = read_json(document_path)?;
    log_event(Event::DocumentLoaded);

    let report = validate_structure(&value, declared_group_count(&value));
    if !report.passed() {
        scope.fail("document is structurally incomplete");
        return finish(report, format, json!({ "document": document_path.display().to_string() }));
    }

    let doc: Document = serde_json::from_value(value).map_err(|e| {
        CliError::document_error(format!("Invalid document {}: {}", document_path.display(), e))
    })?;

    emit_setfile(&doc, output, utf16, true)?;
    scope.complete();
    Ok(0)
}

/// Rebuild a document from a setfile
pub fn import(setfile_path: &Path, groups: Option<u32>, output: Option<&Path>) -> CliResult<i32> {
    let scope = ObservationScope::new("IMPORT");

    let setfile = load_setfile(setfile_path)?;
    let options = ImportOptions {
        group_count: groups,
        ..ImportOptions::default()
    };
    let doc = import_document(&setfile, &options)?;
    let group_count = declared_group_count(&doc);
    info!(
        event = Event::SetfileImported.as_str(),
        keys = setfile.len(),
        groups = group_count,
    );

    // Absent keys leave fields out; count them so the caller knows
    let report = validate_structure(&doc, group_count);

    match output {
        Some(path) => {
            write_json_file(path, &doc)?;
            info!(event = Event::DocumentWritten.as_str(), path = %path.display());
            write_response(json!({
                "output": path.display().to_string(),
                "groups": group_count,
                "keys_read": setfile.len(),
                "missing_fields": report.errors().len(),
            }))?;
        }
        None => write_response(doc)?,
    }

    scope.complete();
    Ok(0)
}

/// Check a document for required fields and cardinality
pub fn validate_structure_cmd(
    document_path: &Path,
    groups: u32,
    audit_booleans: bool,
    format: OutputFormat,
) -> CliResult<i32> {
    let value = read_json(document_path)?;
    log_event(Event::DocumentLoaded);

    let mut report = validate_structure(&value, groups);
    if audit_booleans {
        report.merge(audit_document_booleans(&value));
    }

    finish(
        report,
        format,
        json!({
            "document": document_path.display().to_string(),
            "groups": groups,
            "checked_at": Utc::now().to_rfc3339(),
        }),
    )
}

/// Check a setfile for every key the schema expects
pub fn validate_parity_cmd(
    setfile_path: &Path,
    groups: u32,
    engines: &[EngineId],
    core_only: bool,
    audit_booleans: bool,
    format: OutputFormat,
) -> CliResult<i32> {
    let setfile = load_setfile(setfile_path)?;

    let mut report = ParityValidator::new(groups)
        .with_engines(engines.to_vec())
        .with_scope(scope_of(core_only))
        .validate(&setfile);
    if audit_booleans {
        report.merge(audit_flat_booleans(&setfile, engines, groups));
    }

    finish(
        report,
        format,
        json!({
            "setfile": setfile_path.display().to_string(),
            "encoding": setfile.encoding().as_str(),
            "checksum": setfile.checksum().map(|c| c.to_string()),
            "groups": groups,
            "engines": engines,
            "checked_at": Utc::now().to_rfc3339(),
        }),
    )
}

/// List the flat keys one logic contributes
pub fn keys(engine: EngineId, group: u32, logic: LogicName, core_only: bool, format: OutputFormat) -> CliResult<i32> {
    let keys = expected_keys(engine, group, logic, scope_of(core_only));

    match format {
        OutputFormat::Json => write_response(json!({
            "engine": engine,
            "group": group,
            "logic": logic,
            "keys": keys,
        }))?,
        OutputFormat::Text => write_text(&keys.join("\n"))?,
    }

    Ok(0)
}

fn emit_setfile(doc: &Document, output: Option<&Path>, utf16: bool, include_header: bool) -> CliResult<()> {
    let entries = encode_document(doc)?;
    info!(event = Event::DocumentEncoded.as_str(), keys = entries.len());

    let text = render_setfile(doc, &entries, include_header);

    let Some(path) = output else {
        return write_text(&text);
    };

    let encoding = if utf16 {
        TextEncoding::Utf16Le
    } else {
        TextEncoding::Utf8
    };
    let summary = write_setfile(path, &text, encoding)?;
    info!(
        event = Event::SetfileWritten.as_str(),
        path = %summary.path,
        bytes = summary.bytes,
        checksum = %summary.checksum,
    );

    write_response(json!({
        "keys": entries.len(),
        "engines": doc.engines.len(),
        "groups": doc.group_count(),
        "output": summary,
    }))
}

fn load_setfile(path: &Path) -> CliResult<DecodedSetfile> {
    let setfile = read_setfile(path)?;
    info!(
        event = Event::SetfileDecoded.as_str(),
        path = %path.display(),
        keys = setfile.len(),
        encoding = setfile.encoding().as_str(),
    );
    if setfile.duplicate_keys() > 0 {
        warn!(
            event = Event::DuplicateKeys.as_str(),
            count = setfile.duplicate_keys(),
        );
    }
    Ok(setfile)
}

fn finish(report: ValidationReport, format: OutputFormat, context: Value) -> CliResult<i32> {
    if report.passed() {
        info!(
            event = Event::ValidationPassed.as_str(),
            checked = report.checked(),
            warnings = report.warnings().len(),
        );
    } else {
        warn!(
            event = Event::ValidationFailed.as_str(),
            checked = report.checked(),
            errors = report.errors().len(),
            warnings = report.warnings().len(),
        );
    }

    write_report(&report, format, context)?;
    Ok(report.exit_code())
}

fn scope_of(core_only: bool) -> FieldScope {
    if core_only {
        FieldScope::Core
    } else {
        FieldScope::Full
    }
}

/// Group count of the first engine in a raw document
fn declared_group_count(doc: &Value) -> u32 {
    doc["engines"][0]["groups"]
        .as_array()
        .map(|groups| groups.len() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =============================================================================
    // Helper Functions
    // =============================================================================

    fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("generator.json");
        fs::write(&path, body).unwrap();
        path
    }

    fn generated(dir: &TempDir, groups: u32) -> (std::path::PathBuf, std::path::PathBuf) {
        let config = write_config(dir, &format!(r#"{{"group_count": {}}}"#, groups));
        let setfile = dir.path().join("out.set");
        let document = dir.path().join("doc.json");
        let code = generate(&config, Some(&setfile), None, false, Some(&document)).unwrap();
        assert_eq!(code, 0);
        (setfile, document)
    }

    // =============================================================================
    // Codec Commands
    // =============================================================================

    #[test]
    fn test_generate_writes_setfile_and_document() {
        let dir = TempDir::new().unwrap();
        let (setfile, document) = generated(&dir, 2);

        assert!(setfile.exists());
        assert!(!dir.path().join("out.set.tmp").exists());
        let doc = read_json(&document).unwrap();
        assert_eq!(doc["engines"].as_array().unwrap().len(), 3);
        assert_eq!(doc["engines"][0]["groups"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_groups_override_is_validated() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir, "{}");
        let err = generate(&config, Some(&dir.path().join("x.set")), Some(0), false, None).unwrap_err();
        assert_eq!(err.code_str(), "SETPARITY_CLI_CONFIG_ERROR");
        assert_eq!(err.cause(), Some("SETPARITY_CONFIG_INVALID"));
    }

    #[test]
    fn test_export_matches_generate() {
        let dir = TempDir::new().unwrap();
        let (setfile, document) = generated(&dir, 1);
        let exported = dir.path().join("exported.set");

        assert_eq!(export(&document, Some(&exported), true, OutputFormat::Json).unwrap(), 0);

        let original = read_setfile(&setfile).unwrap();
        let again = read_setfile(&exported).unwrap();
        assert_eq!(again.encoding(), TextEncoding::Utf16Le);
        assert_eq!(original.values(), again.values());
    }

    #[test]
    fn test_export_refuses_incomplete_document() {
        let dir = TempDir::new().unwrap();
        let (_, document) = generated(&dir, 1);
        let mut doc = read_json(&document).unwrap();
        doc["engines"][0]["groups"][0]["logics"][0]
            .as_object_mut()
            .unwrap()
            .remove("grid");
        write_json_file(&document, &doc).unwrap();

        let output = dir.path().join("never.set");
        assert_eq!(export(&document, Some(&output), false, OutputFormat::Text).unwrap(), 1);
        assert!(!output.exists());
    }

    #[test]
    fn test_import_rebuilds_document() {
        let dir = TempDir::new().unwrap();
        let (setfile, document) = generated(&dir, 2);
        let imported = dir.path().join("imported.json");

        assert_eq!(import(&setfile, None, Some(&imported)).unwrap(), 0);

        let original = read_json(&document).unwrap();
        let rebuilt = read_json(&imported).unwrap();
        assert_eq!(rebuilt["engines"], original["engines"]);
    }

    // =============================================================================
    // Validation Commands
    // =============================================================================

    #[test]
    fn test_validation_exit_codes() {
        let dir = TempDir::new().unwrap();
        let (setfile, document) = generated(&dir, 2);

        assert_eq!(validate_structure_cmd(&document, 2, true, OutputFormat::Json).unwrap(), 0);
        assert_eq!(
            validate_parity_cmd(&setfile, 2, &EngineId::ALL, false, true, OutputFormat::Json).unwrap(),
            0
        );
        // More groups than the file holds
        assert_eq!(
            validate_parity_cmd(&setfile, 3, &EngineId::ALL, true, false, OutputFormat::Text).unwrap(),
            1
        );
    }

    #[test]
    fn test_missing_setfile_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = validate_parity_cmd(&dir.path().join("absent.set"), 1, &EngineId::ALL, false, false, OutputFormat::Json)
            .unwrap_err();
        assert_eq!(err.code_str(), "SETPARITY_CLI_SETFILE_ERROR");
        assert_eq!(err.cause(), Some("SETPARITY_IO_ERROR"));
    }

    #[test]
    fn test_keys_command() {
        assert_eq!(keys(EngineId::B, 3, LogicName::Stopper, true, OutputFormat::Text).unwrap(), 0);
    }
}
