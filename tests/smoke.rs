//! Smoke tests -- verify the binary runs and key subcommands parse.

use assert_cmd::Command;

#[test]
fn test_cli_help() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "Monitoring dashboard for n8n-compatible workflow platforms",
        ));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("flowboard"));
}

#[test]
fn test_executions_subcommand_exists() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .args(["executions", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--workflow"));
}

#[test]
fn test_workflow_activate_subcommand_exists() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .args(["workflow", "activate", "--help"])
        .assert()
        .success();
}

#[test]
fn test_scheduler_toggle_subcommand_exists() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .args(["scheduler", "toggle", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--enabled"));
}

#[test]
fn test_overview_subcommand_exists() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .args(["overview", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--range"));
}

#[test]
fn test_serve_subcommand_exists() {
    Command::cargo_bin("flowboard")
        .unwrap()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--bind"));
}
