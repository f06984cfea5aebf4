use anyhow::{Context, Result};
use constraints_core::ValidationContext;
use constraints_parser::parse_file;
use constraints_validator::Validator;
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(schema_path: &str, context: ValidationContext, format: &str) -> Result<()> {
    info!("Checking schema: {}", schema_path);

    let schema = parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    let validator = Validator::with_context(context);
    let errors = validator.check_schema(&schema);

    if format == "json" {
        let output = json!({
            "name": schema.name,
            "version": schema.version,
            "fields": schema.field_count(),
            "valid": errors.is_empty(),
            "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{output:#}");
    } else {
        output::print_info(&format!(
            "Schema loaded: {} v{}",
            schema.name,
            schema.version.as_deref().unwrap_or("-")
        ));

        println!("\nSchema Summary:");
        println!("  Name:        {}", schema.name);
        println!(
            "  Version:     {}",
            schema.version.as_deref().unwrap_or("N/A")
        );
        println!(
            "  Description: {}",
            schema.description.as_deref().unwrap_or("N/A")
        );
        println!("  Fields:      {}", schema.field_count());

        println!("\nExpressions:");
        for (path, expression) in schema.expressions() {
            match errors.iter().find(|err| err.field == path) {
                Some(err) => println!("  ✗ {:<24} {}\n      {}", path, expression, err.comment),
                None => println!("  ✓ {:<24} {}", path, expression),
            }
        }
        println!();

        if errors.is_empty() {
            output::print_success("All expressions are well-formed");
        } else {
            output::print_failure(&format!(
                "{} malformed expression(s)",
                errors.len()
            ));
        }
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
