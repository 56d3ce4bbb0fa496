//! Command-surface tests: explain, rules, schema, md, config handling, and error exits.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn ledgerguard_cmd() -> Command {
    Command::cargo_bin("ledgerguard").expect("ledgerguard binary not found")
}

fn fixture_context(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
        .join("context.json")
}

#[test]
fn explain_known_rule() {
    ledgerguard_cmd()
        .args(["explain", "intake.trial_balance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"));
}

#[test]
fn explain_unknown_rule_lists_ids_and_exits_1() {
    ledgerguard_cmd()
        .args(["explain", "intake.nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown rule id: intake.nope"))
        .stderr(predicate::str::contains("crosscheck.summary_totals"));
}

#[test]
fn rules_lists_builtins_in_phase_order() {
    let output = ledgerguard_cmd().arg("rules").output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let ids: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(
        ids,
        vec![
            "intake.trial_balance",
            "intake.balance_sign",
            "compute.vehicle_cost_limit",
            "analyze.abnormal_balance",
            "crosscheck.summary_totals",
        ]
    );
}

#[test]
fn schema_commands_emit_json() {
    for kind in ["config", "report", "context"] {
        let output = ledgerguard_cmd().args(["schema", kind]).output().expect("run");
        assert!(output.status.success(), "{kind}");
        let value: Value = serde_json::from_slice(&output.stdout).expect("schema json");
        assert!(value.get("properties").is_some(), "{kind}");
    }
    ledgerguard_cmd().args(["schema", "receipt"]).assert().code(1);
}

#[test]
fn report_to_stdout_with_dash() {
    let output = ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--context"])
        .arg(fixture_context("balanced_books"))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_slice(&output.stdout).expect("report json");
    assert_eq!(report["tool"]["name"], "ledgerguard");
    assert_eq!(report["result"]["subject_id"], "acme-trading");
    assert_eq!(report["result"]["period"], "FY2024");
}

#[test]
fn phase_and_category_overrides_narrow_the_run() {
    let output = ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--phase", "intake", "--phase", "analyze"])
        .args(["--category", "risk", "--context"])
        .arg(fixture_context("unbalanced_books"))
        .output()
        .expect("run");
    let report: Value = serde_json::from_slice(&output.stdout).expect("report json");
    let phases: Vec<&str> = report["result"]["phases"]
        .as_array()
        .expect("phases")
        .iter()
        .map(|p| p["phase"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(phases, vec!["INTAKE", "ANALYZE"]);
    assert_eq!(report["result"]["summary"]["total_rules"], 1);
    assert_eq!(report["result"]["risk_score"], 20);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn config_file_disables_rules_and_sets_fail_on() {
    let tmp = TempDir::new().expect("temp dir");
    let config = tmp.path().join("ledgerguard.toml");
    std::fs::write(
        &config,
        r#"
fail_on = "critical"

[rules."intake.trial_balance"]
enabled = false
"#,
    )
    .expect("write config");

    let output = ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--config"])
        .arg(&config)
        .arg("--context")
        .arg(fixture_context("unbalanced_books"))
        .output()
        .expect("run");
    let report: Value = serde_json::from_slice(&output.stdout).expect("report json");
    assert_eq!(report["result"]["risk_score"], 20);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn default_config_is_picked_up_from_working_directory() {
    let tmp = TempDir::new().expect("temp dir");
    std::fs::write(tmp.path().join("ledgerguard.toml"), "fail_on = \"low\"\n")
        .expect("write config");

    ledgerguard_cmd()
        .current_dir(tmp.path())
        .args(["check", "--report-out", "-", "--context"])
        .arg(fixture_context("balanced_books"))
        .assert()
        .code(2);
}

#[test]
fn markdown_is_written_and_rerendered() {
    let tmp = TempDir::new().expect("temp dir");
    let report = tmp.path().join("out/report.json");
    let md = tmp.path().join("out/comment.md");

    ledgerguard_cmd()
        .args(["check", "--write-markdown", "--context"])
        .arg(fixture_context("unbalanced_books"))
        .arg("--report-out")
        .arg(&report)
        .arg("--markdown-out")
        .arg(&md)
        .assert()
        .code(2);

    let written = std::fs::read_to_string(&md).expect("markdown written");
    assert!(written.contains("[CRITICAL] `intake.trial_balance`"));

    ledgerguard_cmd()
        .args(["md", "--report"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Risk: **HIGH** (50/100)"));
}

#[test]
fn missing_context_is_a_runtime_error() {
    ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--context", "does/not/exist.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read context"));
}

#[test]
fn invalid_context_is_a_runtime_error() {
    let tmp = TempDir::new().expect("temp dir");
    let ctx = tmp.path().join("ctx.json");
    std::fs::write(
        &ctx,
        r#"{"subject": {"id": ""}, "period": {"start": "2024-01-01", "end": "2024-12-31"}}"#,
    )
    .expect("write context");

    ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--context"])
        .arg(&ctx)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("subject id"));
}

#[test]
fn explicit_missing_config_is_a_runtime_error() {
    ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--config", "nope.toml", "--context"])
        .arg(fixture_context("balanced_books"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read config"));
}

#[test]
fn invalid_profile_is_a_runtime_error() {
    ledgerguard_cmd()
        .args(["check", "--report-out", "-", "--profile", "paranoid", "--context"])
        .arg(fixture_context("balanced_books"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown profile"));
}
