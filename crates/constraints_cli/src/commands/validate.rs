use anyhow::{Context, Result, anyhow, bail};
use constraints_core::{ValidationContext, ValidationReport};
use constraints_parser::parse_file;
use constraints_validator::Validator;
use serde_json::Value as Json;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(
    schema_path: &str,
    data_path: &str,
    context: ValidationContext,
    format: &str,
) -> Result<()> {
    info!("Validating {} against schema {}", data_path, schema_path);
    info!("Strict mode: {}", context.strict);

    let schema = parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;
    let data = load_data(Path::new(data_path))?;

    if format == "text" {
        output::print_info(&format!(
            "Schema loaded: {} ({} fields)",
            schema.name,
            schema.field_count()
        ));
    }

    let validator = Validator::with_context(context);

    // Broken expressions fail the run before any document is looked at.
    let syntax_errors = validator.check_schema(&schema);
    let report = if !syntax_errors.is_empty() {
        let mut report = ValidationReport::success();
        for err in syntax_errors {
            report.record_rejected(err.to_string());
        }
        report
    } else {
        match &data {
            Json::Array(documents) => validator.validate_json_batch(&schema, documents),
            document => {
                let mut report = ValidationReport::success();
                match validator.validate_json(&schema, document) {
                    Ok(()) => report.record_passed(),
                    Err(err) => report.record_failed(err.to_string()),
                }
                report
            }
        }
    };

    output::print_validation_report(&schema.name, &report, format);

    if !report.passed {
        std::process::exit(1);
    }

    Ok(())
}

/// Reads a JSON or YAML data file, chosen by extension.
fn load_data(path: &Path) -> Result<Json> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| anyhow!("Data file has no extension: {}", path.display()))?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;

    let data = match extension.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON data: {}", path.display()))?,
        "yaml" | "yml" => serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse YAML data: {}", path.display()))?,
        other => bail!("Unsupported data format: {}", other),
    };

    Ok(data)
}
