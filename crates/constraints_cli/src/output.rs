use colored::*;
use constraints_core::ValidationReport;
use serde_json::json;

pub fn print_validation_report(schema: &str, report: &ValidationReport, format: &str) {
    match format {
        "json" => print_json_report(schema, report),
        _ => print_text_report(schema, report),
    }
}

fn print_text_report(schema: &str, report: &ValidationReport) {
    let stats = &report.stats;

    println!();
    if report.passed {
        print_success(&format!("Validation PASSED for {}", schema.bold()));
    } else {
        print_failure(&format!("Validation FAILED for {}", schema.bold()));
    }

    if stats.expressions_rejected > 0 {
        println!(
            "  {} malformed expression(s), no document checked",
            stats.expressions_rejected
        );
    } else {
        println!(
            "  {} document(s) checked, {} failed in {} ms",
            stats.records_validated, stats.records_failed, stats.duration_ms
        );
    }

    for error in &report.errors {
        // Batch errors lead with the index of the failing document.
        match error.split_once(": ") {
            Some((document, message)) if document.starts_with("document ") => {
                println!("  {:<14} {}", document.dimmed(), message.red());
            }
            _ => println!("  {}", error.red()),
        }
    }
}

fn print_json_report(schema: &str, report: &ValidationReport) {
    let stats = &report.stats;
    let output = json!({
        "schema": schema,
        "passed": report.passed,
        "documents": {
            "validated": stats.records_validated,
            "failed": stats.records_failed,
        },
        "expressions_rejected": stats.expressions_rejected,
        "duration_ms": stats.duration_ms,
        "errors": report.errors,
    });

    println!("{output:#}");
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_failure(message: &str) {
    println!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
