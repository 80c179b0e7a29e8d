//! Integration tests for rivulet-cli.
//!
//! Tests invoke the built binary against the shipped patches.

use std::path::PathBuf;
use std::process::Command;

/// Helper to get the path to the `rivulet` binary built by cargo.
fn rivulet_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rivulet"));
    cmd.env_remove("RIVULET_DISABLE_CONNECTORS");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn patch_path(name: &str) -> String {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "patches", name].iter().collect();
    path.to_string_lossy().into_owned()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run rivulet");
    assert!(
        output.status.success(),
        "rivulet failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// `rivulet modules`
// ---------------------------------------------------------------------------

#[test]
fn cli_modules_lists_builtins() {
    let stdout = stdout_of(rivulet_bin().arg("modules"));
    assert!(stdout.contains("Available Modules"));
    for id in ["value", "scale", "sum", "accumulator", "counter"] {
        assert!(stdout.contains(id), "listing should contain '{id}'");
    }
}

#[test]
fn cli_modules_detail_shows_connectors() {
    let stdout = stdout_of(rivulet_bin().args(["modules", "sum"]));
    assert!(stdout.contains("AddSummand"));
    assert!(stdout.contains("multi-input"));
    assert!(stdout.contains("GetTerms"));
}

#[test]
fn cli_modules_unknown_fails() {
    let output = rivulet_bin()
        .args(["modules", "oscillator"])
        .output()
        .expect("failed to run rivulet");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown module"));
}

// ---------------------------------------------------------------------------
// `rivulet run`
// ---------------------------------------------------------------------------

#[test]
fn cli_run_prints_readings() {
    let stdout = stdout_of(rivulet_bin().args(["run", &patch_path("double.toml")]));
    assert!(stdout.contains("a.GetValue = 5"), "got: {stdout}");
    assert!(stdout.contains("b.GetOutput = 10"), "got: {stdout}");
}

#[test]
fn cli_run_applies_overrides() {
    let stdout = stdout_of(rivulet_bin().args([
        "run",
        &patch_path("double.toml"),
        "--set",
        "a.SetValue=7",
        "--read",
        "b.GetOutput",
    ]));
    assert!(stdout.contains("b.GetOutput = 14"), "got: {stdout}");
}

#[test]
fn cli_run_json_report() {
    let stdout = stdout_of(rivulet_bin().args(["run", &patch_path("sums.toml"), "--json"]));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["patch"], "sums");
    assert_eq!(report["mode"], "graph");
    assert_eq!(report["readings"][0]["target"], "total.GetSum");
    assert_eq!(report["readings"][0]["value"], 6.0);
    assert_eq!(report["readings"][1]["value"], serde_json::json!([1.0, 2.0, 3.0]));
}

#[test]
fn cli_run_pass_through_flag() {
    let stdout = stdout_of(rivulet_bin().args([
        "run",
        &patch_path("double.toml"),
        "--pass-through",
        "--json",
    ]));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["mode"], "pass-through");
    assert_eq!(report["skipped_connections"], 1);
    assert_eq!(report["readings"][1]["value"], 0.0);
}

#[test]
fn cli_run_env_disables_connectors() {
    let stdout = stdout_of(
        rivulet_bin()
            .env("RIVULET_DISABLE_CONNECTORS", "1")
            .args(["run", &patch_path("double.toml")]),
    );
    assert!(stdout.contains("pass-through"), "got: {stdout}");
    assert!(stdout.contains("b.GetOutput = 0"), "got: {stdout}");
}

#[test]
fn cli_run_config_file_selects_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "connectors = \"pass-through\"\n").unwrap();

    let stdout = stdout_of(rivulet_bin().args([
        "run",
        &patch_path("stats.toml"),
        "--config",
        &config.to_string_lossy(),
        "--json",
    ]));
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["mode"], "pass-through");
}

#[test]
fn cli_run_missing_patch_fails() {
    let output = rivulet_bin()
        .args(["run", "no-such-patch"])
        .output()
        .expect("failed to run rivulet");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Patch not found"));
}

#[test]
fn cli_run_bad_override_fails() {
    let output = rivulet_bin()
        .args(["run", &patch_path("double.toml"), "--set", "b.GetOutput=1"])
        .output()
        .expect("failed to run rivulet");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("set b.GetOutput"));
}

// ---------------------------------------------------------------------------
// `rivulet demo` and `rivulet config`
// ---------------------------------------------------------------------------

#[test]
fn cli_demo_walkthrough() {
    let stdout = stdout_of(rivulet_bin().arg("demo"));
    assert!(stdout.contains("b.GetOutput = 10"), "got: {stdout}");
    assert!(stdout.contains("b.GetOutput = 16"), "got: {stdout}");
    assert!(stdout.contains("destroyed module"), "got: {stdout}");
}

#[test]
fn cli_config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("rivulet").join("config.toml");
    let config_arg = config.to_string_lossy().into_owned();

    let stdout = stdout_of(rivulet_bin().args(["config", "--init", "--config", &config_arg]));
    assert!(stdout.contains("Wrote"), "got: {stdout}");
    assert!(config.is_file());

    let stdout = stdout_of(rivulet_bin().args(["config", "--config", &config_arg]));
    assert!(stdout.contains("connectors = \"graph\""), "got: {stdout}");

    let stdout = stdout_of(rivulet_bin().args(["config", "--init", "--config", &config_arg]));
    assert!(stdout.contains("already exists"), "got: {stdout}");
}
