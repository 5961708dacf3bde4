use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use growth_scenario_explorer::{
    io::write_scenarios_csv,
    models::{CellValue, ModelKind, ScenarioRow, ScenarioTable},
};

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("growth-explorer").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn sample_table() -> ScenarioTable {
    ScenarioTable::from_rows(vec![
        ScenarioRow::new("Base", ModelKind::Logistic, 10.0, 0.1, 100.0),
        ScenarioRow::new("Boom", ModelKind::Exponential, 10.0, 0.1, 0.0),
        ScenarioRow {
            name: Some("Broken".to_string()),
            model: Some("logistic".to_string()),
            n0: Some(10.0.into()),
            r: Some(CellValue::Text("fast".to_string())),
            k: Some(100.0.into()),
        },
    ])
}

/// Write the sample table to a CSV file in the given directory.
fn create_test_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("scenarios.csv");
    write_scenarios_csv(&sample_table(), &path).unwrap();
    path
}

// --- run ---

#[test]
fn test_run_default_table() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("default scenarios"))
        .stdout(predicate::str::contains("Base"))
        .stdout(predicate::str::contains("Curve Summary"))
        .stdout(predicate::str::contains("Growth Curves"));
}

#[test]
fn test_run_with_invalid_row_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = create_test_csv(&dir);
    cmd(&dir)
        .args(["run", "--input", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Boom"))
        .stdout(predicate::str::contains("1484.13"))
        .stdout(predicate::str::contains("Skipped Scenarios"))
        .stdout(predicate::str::contains("Broken"));
}

#[test]
fn test_run_strict_fails_on_invalid_row() {
    let dir = TempDir::new().unwrap();
    let input = create_test_csv(&dir);
    cmd(&dir)
        .args(["run", "--strict", "--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn test_run_with_chart() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["run", "--chart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Population Over Time"))
        .stdout(predicate::str::contains("Base (Logistic)"));
}

#[test]
fn test_run_export_csv() {
    let dir = TempDir::new().unwrap();
    let input = create_test_csv(&dir);
    let output = dir.path().join("curves.csv");
    cmd(&dir)
        .args([
            "run",
            "--input",
            input.to_str().unwrap(),
            "--resolution",
            "100",
            "--export",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success:"));

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("scenario,model,t,value"));
    assert_eq!(text.lines().count(), 1 + 2 * 100);
}

#[test]
fn test_run_export_json() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("curves.json");
    cmd(&dir)
        .args(["run", "--pretty", "--export", output.to_str().unwrap()])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["curves"]["Base"]["values"].as_array().unwrap().len(), 500);
}

#[test]
fn test_run_rejects_out_of_range_time() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["run", "--horizon", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("horizon"));
    cmd(&dir)
        .args(["run", "--resolution", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resolution"));
}

#[test]
fn test_run_unsupported_input_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scenarios.xlsx");
    std::fs::write(&input, "not a spreadsheet").unwrap();
    cmd(&dir)
        .args(["run", "--input", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn test_run_missing_input_file() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["run", "--input", "nope.csv"])
        .assert()
        .failure();
}

// --- simulate / compare ---

#[test]
fn test_simulate_exponential() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "simulate", "--name", "Solo", "--model", "exponential", "--n0", "10", "--rate", "0.1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Solo"))
        .stdout(predicate::str::contains("1484.13"))
        .stdout(predicate::str::contains("6.93"));
}

#[test]
fn test_simulate_rejects_negative_n0() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["simulate", "--n0=-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario parameters"));
}

#[test]
fn test_compare_shows_both_models() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["compare", "--n0", "10", "--rate", "0.1", "-k", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model Comparison"))
        .stdout(predicate::str::contains("Exponential"))
        .stdout(predicate::str::contains("Logistic"))
        .stdout(predicate::str::contains("94.28"));
}

// --- config ---

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    cmd(&dir)
        .args(["config", "init", "--output", path.to_str().unwrap()])
        .assert()
        .success();
    assert!(path.exists());

    cmd(&dir)
        .args(["config", "init", "--output", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cmd(&dir)
        .args(["--config", path.to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[time]"))
        .stdout(predicate::str::contains("resolution = 500"));
}

#[test]
fn test_config_file_in_working_directory_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("growth-explorer.toml"),
        "[defaults]\nmodel = \"exponential\"\nn0 = 1.0\nr = 0.2\n",
    )
    .unwrap();

    cmd(&dir)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exponential"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--config", "missing.toml", "run"])
        .assert()
        .failure();
}

// --- help ---

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("config"));
}
