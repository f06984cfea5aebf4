use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Helper to create a Command for the constrain binary
// TODO: Migrate to cargo::cargo_bin_cmd! macro when available
// See: https://github.com/assert-rs/assert_cmd/issues/139
#[allow(deprecated)]
fn constrain() -> Command {
    Command::cargo_bin("constrain").expect("Failed to find constrain binary")
}

/// Extracts the JSON object printed on stdout.
fn json_stdout(output: &[u8]) -> serde_json::Value {
    let output_str = String::from_utf8_lossy(output);
    let json_start = output_str.find('{').expect("Should contain JSON object");
    serde_json::from_str(&output_str[json_start..]).expect("Output should be valid JSON")
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_valid_document() {
    constrain()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"))
        .stdout(predicate::str::contains("user_profile"));
}

#[test]
fn test_validate_yaml_document() {
    constrain()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("user_valid.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn test_validate_invalid_document() {
    constrain()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("user_invalid.json"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains("field \"tags\""))
        .stdout(predicate::str::contains("format=alpha"));
}

#[test]
fn test_validate_toml_schema() {
    constrain()
        .arg("validate")
        .arg(fixture_path("users.toml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .success();
}

#[test]
fn test_validate_batch_json_output() {
    let output = constrain()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("users_batch.json"))
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let report = json_stdout(&output);
    assert_eq!(report["schema"], "user_profile");
    assert_eq!(report["passed"], false);
    assert_eq!(report["documents"]["validated"], 3);
    assert_eq!(report["documents"]["failed"], 2);
    assert_eq!(report["expressions_rejected"], 0);

    let errors = report["errors"].as_array().expect("errors should be an array");
    assert!(errors[0].as_str().unwrap().starts_with("document 1: "));
    assert!(errors[1].as_str().unwrap().starts_with("document 2: "));
    assert!(errors[1].as_str().unwrap().contains("empty=false"));
}

#[test]
fn test_validate_rejects_malformed_schema_expressions() {
    constrain()
        .arg("validate")
        .arg(fixture_path("bad_expressions.yml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("expected closing bracket"))
        .stdout(predicate::str::contains("unknown validator"));
}

#[test]
fn test_validate_counts_rejected_expressions() {
    let output = constrain()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("bad_expressions.yml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let report = json_stdout(&output);
    assert_eq!(report["passed"], false);
    assert_eq!(report["expressions_rejected"], 3);
    assert_eq!(report["documents"]["validated"], 0);
    assert_eq!(report["errors"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_validate_lenient_flag() {
    constrain()
        .arg("validate")
        .arg(fixture_path("lenient.yml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown validator"));

    constrain()
        .arg("validate")
        .arg("--lenient")
        .arg(fixture_path("lenient.yml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .success();
}

#[test]
fn test_validate_missing_data_file() {
    constrain()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_validate_unsupported_data_format() {
    let temp_dir = TempDir::new().unwrap();
    let data_file = temp_dir.path().join("data.csv");
    fs::write(&data_file, "age\n30\n").unwrap();

    constrain()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(data_file.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported data format"));
}

#[test]
fn test_validate_non_object_document() {
    let temp_dir = TempDir::new().unwrap();
    let data_file = temp_dir.path().join("scalar.json");
    fs::write(&data_file, "42").unwrap();

    constrain()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(data_file.to_str().unwrap())
        .assert()
        .failure()
        .stdout(predicate::str::contains("not a record or record reference"));
}

#[test]
fn test_validate_with_invalid_format() {
    constrain()
        .arg("validate")
        .arg("--format")
        .arg("xml")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("user_valid.json"))
        .assert()
        .failure();
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_valid_schema() {
    constrain()
        .arg("check")
        .arg(fixture_path("users.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("user_profile"))
        .stdout(predicate::str::contains("address.zip"))
        .stdout(predicate::str::contains("All expressions are well-formed"));
}

#[test]
fn test_check_reports_each_bad_expression() {
    let output = constrain()
        .arg("check")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("bad_expressions.yml"))
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let result = json_stdout(&output);
    assert_eq!(result["valid"], false);
    assert_eq!(result["fields"], 4);
    assert_eq!(result["errors"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_check_lenient_keeps_bracket_errors() {
    let output = constrain()
        .arg("check")
        .arg("--lenient")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("bad_expressions.yml"))
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let result = json_stdout(&output);
    let errors = result["errors"].as_array().expect("errors should be an array");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("expected closing bracket"));
}

#[test]
fn test_check_invalid_schema_file() {
    constrain()
        .arg("check")
        .arg(fixture_path("invalid_schema.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let empty_file = temp_dir.path().join("empty.yml");
    fs::write(&empty_file, "").unwrap();

    constrain()
        .arg("check")
        .arg(empty_file.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// explain command tests
// ============================================================================

#[test]
fn test_explain_text() {
    constrain()
        .arg("explain")
        .arg("gte=1 & lte=2 | eq=4 > [empty=false] > gte=0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Levels:     3"))
        .stdout(predicate::str::contains("rules: gte=1 & lte=2 | eq=4"))
        .stdout(predicate::str::contains("keys:"))
        .stdout(predicate::str::contains("rules: empty=false"));
}

#[test]
fn test_explain_json() {
    let output = constrain()
        .arg("explain")
        .arg("--format")
        .arg("json")
        .arg("[empty=false] > gte=0")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let tree = json_stdout(&output);
    assert_eq!(tree["rules"], serde_json::json!([]));
    assert_eq!(tree["key"]["rules"][0][0]["name"], "empty");
    assert_eq!(tree["key"]["rules"][0][0]["param"], "false");
    assert_eq!(tree["next"]["rules"][0][0]["name"], "gte");
    assert!(tree["next"]["next"].is_null());
}

#[test]
fn test_explain_invalid_expression() {
    constrain()
        .arg("explain")
        .arg("[gte=0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected closing bracket"));

    constrain()
        .arg("explain")
        .arg("gte=0 >")
        .assert()
        .failure();

    constrain()
        .arg("explain")
        .arg("--allow-trailing-dive")
        .arg("gte=0 >")
        .assert()
        .success();
}

// ============================================================================
// general CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    constrain()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("explain"));
}

#[test]
fn test_cli_version() {
    constrain()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("constrain"));
}

#[test]
fn test_validate_help() {
    constrain()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--lenient"))
        .stdout(predicate::str::contains("--allow-trailing-dive"))
        .stdout(predicate::str::contains("--format"));
}
