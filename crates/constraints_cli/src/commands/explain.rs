use anyhow::{Context, Result};
use constraints_core::ValidationContext;
use constraints_parser::{Expression, RuleSet};
use constraints_validator::Validator;
use serde_json::{Value, json};
use tracing::info;

pub fn execute(expression: &str, context: ValidationContext, format: &str) -> Result<()> {
    info!("Explaining expression: {}", expression);

    let validator = Validator::with_context(context);
    let parsed = validator
        .check_expression(expression)
        .with_context(|| format!("Invalid expression: {}", expression))?;

    if format == "json" {
        println!("{:#}", to_json(&parsed));
    } else {
        println!("Expression: {}", expression);
        println!("Levels:     {}\n", parsed.depth());
        print_level(&parsed, 0);
    }

    Ok(())
}

fn describe(rules: &RuleSet) -> String {
    if rules.is_empty() {
        "(no rules)".to_string()
    } else {
        rules.to_string()
    }
}

fn print_level(expression: &Expression, indent: usize) {
    let pad = "  ".repeat(indent);
    println!("{}rules: {}", pad, describe(&expression.rules));

    if let Some(key) = &expression.key {
        println!("{}keys:", pad);
        print_level(key, indent + 1);
    }
    if let Some(next) = &expression.next {
        println!("{}then:", pad);
        print_level(next, indent + 1);
    }
}

fn to_json(expression: &Expression) -> Value {
    let groups: Vec<Value> = expression
        .rules
        .groups()
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|rule| json!({ "name": rule.name, "param": rule.param }))
                .collect()
        })
        .collect();

    json!({
        "rules": groups,
        "key": expression.key.as_deref().map(to_json),
        "next": expression.next.as_deref().map(to_json),
    })
}
