//! Integration tests for the `becsync` binary.
//!
//! These validate argument parsing, help output, and error handling
//! without requiring a live BECS or NetBox instance.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `becsync` binary with env isolation.
///
/// Points HOME at a nonexistent path and clears `BECSYNC_*` env vars so
/// tests never touch real configuration or caches.
fn becsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("becsync");
    cmd.env("HOME", "/tmp/becsync-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/becsync-test-nonexistent")
        .env("XDG_CACHE_HOME", "/tmp/becsync-test-nonexistent")
        .env_remove("BECSYNC_CONFIG")
        .env_remove("BECSYNC_BECS__URL")
        .env_remove("BECSYNC_BECS__USERNAME")
        .env_remove("BECSYNC_BECS__PASSWORD")
        .env_remove("BECSYNC_NETBOX__URL")
        .env_remove("BECSYNC_NETBOX__TOKEN");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = becsync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_subcommands() {
    becsync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("sync")
            .and(predicate::str::contains("elements"))
            .and(predicate::str::contains("object")),
    );
}

#[test]
fn version_flag() {
    becsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("becsync"));
}

#[test]
fn sync_help_shows_refresh_flags() {
    becsync_cmd().args(["sync", "--help"]).assert().success().stdout(
        predicate::str::contains("--refresh-source")
            .and(predicate::str::contains("--refresh-target"))
            .and(predicate::str::contains("--name")),
    );
}

#[test]
fn object_requires_an_oid() {
    let output = becsync_cmd().arg("object").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("OID"));
}

#[test]
fn object_rejects_a_non_numeric_oid() {
    let output = becsync_cmd().args(["object", "abc"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Credential handling ─────────────────────────────────────────────

#[test]
fn sync_without_credentials_fails_with_usage_error() {
    // No config file and no env credentials; a source refresh needs a
    // BECS session and must fail before any network traffic.
    let output = becsync_cmd()
        .args(["sync", "--refresh-source"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("username") || text.contains("credentials") || text.contains("config"),
        "Expected a credentials hint in output:\n{text}"
    );
}

#[test]
fn object_without_credentials_fails_with_usage_error() {
    let output = becsync_cmd().args(["object", "1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
