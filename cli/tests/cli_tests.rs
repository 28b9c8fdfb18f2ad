//! Integration tests for the schema-migrate CLI.
//!
//! These exercise argument parsing and error surfaces only; the runner's
//! transactional apply/rollback behavior against a live database is
//! covered by unit tests in `schema-migrate-core` rather than here.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn schema_migrate_cmd() -> Command {
    Command::cargo_bin("schema-migrate").unwrap()
}

#[test]
fn test_help_command() {
    schema_migrate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operational CLI for pg-schema-migrate"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("rollback"));
}

#[test]
fn test_init_help() {
    schema_migrate_cmd()
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--schema-name"))
        .stdout(predicate::str::contains("--migrations-table"));
}

#[test]
fn test_migrate_help() {
    schema_migrate_cmd()
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_rollback_help() {
    schema_migrate_cmd()
        .args(["rollback", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_missing_database_url_fails() {
    schema_migrate_cmd()
        .env_remove("DATABASE_URL")
        .args(["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("database-url").or(predicate::str::contains("DATABASE_URL")));
}

#[test]
fn test_invalid_command() {
    schema_migrate_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_global_version_flag() {
    schema_migrate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}
