//! Command-line contract of the `brand-forge` binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_usage_and_environment() {
    Command::cargo_bin("brand-forge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"))
        .stdout(predicate::str::contains("brand-forge [PRODUCT DESCRIPTION]"))
        .stdout(predicate::str::contains("OPENAI_API_KEY"))
        .stdout(predicate::str::contains("USPTO_API_KEY"))
        .stdout(predicate::str::contains("BRAND_FORGE_MAX_LOOP_ITERATIONS"))
        .stdout(predicate::str::contains("BRAND_FORGE_INCLUDE_PREFIXES"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("brand-forge")
        .unwrap()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_providers_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("brand-forge")
        .unwrap()
        .current_dir(dir.path())
        .env_clear()
        .arg("meal planner")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No LLM providers configured"));
}

#[test]
fn test_malformed_setting_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("brand-forge")
        .unwrap()
        .current_dir(dir.path())
        .env_clear()
        .env("BRAND_FORGE_CACHE_TTL_SECS", "five minutes")
        .arg("meal planner")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BRAND_FORGE_CACHE_TTL_SECS"));
}
