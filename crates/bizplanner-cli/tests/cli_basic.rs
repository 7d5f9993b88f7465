//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! (BIZPLANNER_ENV=dev) and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "bizplanner-cli", "--"])
        .args(args)
        .env("BIZPLANNER_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn help_lists_every_domain() {
    let (stdout, stderr, code) = run_cli(&["--help"]);
    assert_eq!(code, 0, "help failed: {stderr}");
    for domain in ["profile", "project", "task", "stats", "game", "prefs", "reset"] {
        assert!(
            stdout.contains(domain),
            "expected '{domain}' in help output"
        );
    }
}

#[test]
fn prefs_show_emits_json() {
    let (stdout, stderr, code) = run_cli(&["prefs", "show"]);
    assert_eq!(code, 0, "prefs show failed: {stderr}");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("prefs show should print JSON");
    assert!(parsed.get("has_onboarded").is_some());
    assert!(parsed.get("notifications_enabled").is_some());
}

#[test]
fn reset_refuses_without_confirmation() {
    let (_, stderr, code) = run_cli(&["reset"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--yes"));
}

#[test]
fn unknown_pref_key_fails() {
    let (_, stderr, code) = run_cli(&["prefs", "set", "no_such_key", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no_such_key"));
}
