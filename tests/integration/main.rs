//! Integration tests for the leakscan CLI
//!
//! These tests build real repositories with the `git` command and run the
//! compiled binary against them: scan → report → exit status.

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use common::git_repo::TempGitRepo;

/// Isolated environment: no user config, mirrors under a temp dir
struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    /// Helper function to create a leakscan command
    fn leakscan(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("leakscan"));
        cmd.env("HOME", self.home.path())
            .env_remove("LEAKSCAN_CONFIG")
            .env("NO_COLOR", "1");
        cmd
    }

    fn mirror_root(&self) -> String {
        self.home.path().join("mirrors").display().to_string()
    }
}

// =============================================================================
// BASIC COMMANDS
// =============================================================================

#[test]
fn test_version() {
    Sandbox::new()
        .leakscan()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("leakscan v"));
}

#[test]
fn test_version_json() {
    let output = Sandbox::new().leakscan().args(["version", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_no_command_prints_hint() {
    Sandbox::new()
        .leakscan()
        .assert()
        .success()
        .stdout(predicate::str::contains("leakscan --help"));
}

#[test]
fn test_rules_lists_reference_set_in_order() {
    Sandbox::new()
        .leakscan()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)secret.*p@ssword").unwrap());
}

#[test]
fn test_rules_from_config_file() {
    let sandbox = Sandbox::new();
    let config = sandbox.home.path().join("rules.toml");
    fs::write(&config, "[[rules]]\nname = \"token\"\npattern = \"tok_[a-z0-9]+\"\n").unwrap();

    sandbox
        .leakscan()
        .args(["rules", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("token"))
        .stdout(predicate::str::contains("matches /tok_[a-z0-9]+/"));
}

// =============================================================================
// SCAN
// =============================================================================

#[test]
fn test_scan_clean_repository_exits_zero() {
    let repo = TempGitRepo::new();
    repo.commit_file("README.md", "# hello\n", "init");

    Sandbox::new()
        .leakscan()
        .args(["scan", repo.path_str().as_str()])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("0 finding(s)"));
}

#[test]
fn test_scan_with_findings_exits_one() {
    let repo = TempGitRepo::new();
    let root = repo.commit_file("a.txt", "password=secret123\n", "init");

    Sandbox::new()
        .leakscan()
        .args(["scan", repo.path_str().as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[1]"))
        .stdout(predicate::str::contains(format!("/commit/{root}")))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("password=secret123"));
}

#[test]
fn test_scan_json_report() {
    let repo = TempGitRepo::new();
    repo.commit_file("a.txt", "clean\n", "init");
    let fix = repo.commit_file("b.txt", "still clean\n", "fix p@ssword bug");

    let output = Sandbox::new()
        .leakscan()
        .args(["scan", "--json", repo.path_str().as_str()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["commits"], 2);
    let findings = json["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["kind"], "commit");
    assert_eq!(findings[0]["commit"], fix.as_str());
    assert_eq!(findings[0]["path"], "");
}

#[test]
fn test_scan_uses_configured_rules() {
    let repo = TempGitRepo::new();
    repo.commit_file("env", "API=tok_abc123\nsecret=no\n", "init");

    let sandbox = Sandbox::new();
    let config = sandbox.home.path().join("leakscan.toml");
    fs::write(
        &config,
        "[[rules]]\nname = \"token\"\npattern = \"tok_[a-z0-9]+\"\nmessage = \"API token\"\n",
    )
    .unwrap();

    let output = sandbox
        .leakscan()
        .args(["scan", "--json", repo.path_str().as_str()])
        .env("LEAKSCAN_CONFIG", &config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let findings = json["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["rule"], "token");
    assert_eq!(findings[0]["message"], "API token");
    assert_eq!(findings[0]["excerpt"], "API=tok_abc123");
}

#[test]
fn test_scan_remote_through_mirror() {
    let upstream = TempGitRepo::new();
    upstream.commit_file("a.txt", "secret\n", "init");
    let sandbox = Sandbox::new();

    // A path that is not an existing directory is treated as a remote URL
    let url = format!("file://{}", upstream.path_str());
    sandbox
        .leakscan()
        .args(["scan", "--no-gc", "--mirror-root", sandbox.mirror_root().as_str(), url.as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.txt"));

    assert!(fs::read_dir(sandbox.mirror_root()).unwrap().next().is_some());
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_scan_unreachable_repository_exits_two() {
    let sandbox = Sandbox::new();
    let missing = sandbox.home.path().join("no").join("such").join("repo");

    sandbox
        .leakscan()
        .args(["scan", "--mirror-root", sandbox.mirror_root().as_str()])
        .arg(&missing)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to acquire repository"));
}

#[test]
fn test_invalid_config_exits_two() {
    let repo = TempGitRepo::new();
    repo.commit_file("a.txt", "a\n", "init");
    let sandbox = Sandbox::new();
    let config = sandbox.home.path().join("bad.toml");
    fs::write(&config, "[[rules]]\nname = \"both\"\ncontains = \"a\"\npattern = \"b\"\n").unwrap();

    sandbox
        .leakscan()
        .args(["scan", repo.path_str().as_str(), "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exactly one of"));
}
