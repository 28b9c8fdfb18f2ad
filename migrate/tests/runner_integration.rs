//! End-to-end runner tests against a live PostgreSQL instance.
//!
//! Skipped entirely when `DATABASE_URL` isn't set, following the pack's
//! convention of keeping fast pure-function tests inline in `src/` and
//! reserving `tests/` for integration-level coverage that needs real
//! infrastructure. Run these locally with a throwaway database, e.g.:
//!
//! ```text
//! DATABASE_URL=postgres://postgres@localhost/schema_migrate_test cargo test -p schema-migrate-core --test runner_integration
//! ```

use chrono::Utc;
use schema_migrate_core::{ApplyOptions, PlanOptions, RollbackOptions, Runner, RunnerConfig, generate_from_diff};
use schema_migrate_model::{Extension, Field, FieldType, Model, Schema};
use tempfile::tempdir;

/// Returns `None` and prints a skip notice when no live database is configured.
fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

fn fresh_install_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_extension(Extension::new("pg_trgm"));
    let mut user = Model::new("IntegrationUser");
    user.add_field(Field::new("id", FieldType::uuid()).id());
    user.add_field(Field::varchar("email", 255).unique());
    schema.add_model(user);
    schema
}

/// Spec §8 scenario S1: fresh install, apply, then roll back to empty.
#[tokio::test]
async fn fresh_install_applies_and_rolls_back_cleanly() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let dir = tempdir().unwrap();
    let schema_name = format!("migrate_test_{}", std::process::id());
    let to = fresh_install_schema();
    let migration = generate_from_diff(
        &Schema::new(),
        &to,
        "0001",
        "fresh install",
        Utc::now(),
        &PlanOptions::new(schema_name.clone()),
    )
    .unwrap();

    let store = schema_migrate_core::MigrationStore::new(dir.path());
    store.write(&migration).await.unwrap();

    let config = RunnerConfig::new(url, dir.path()).with_schema_name(schema_name.clone());
    let runner = Runner::new(config).unwrap();
    runner.init().await.unwrap();

    let apply_result = runner.apply(ApplyOptions::default()).await.unwrap();
    assert!(apply_result.success, "apply failed: {:?}", apply_result.error);
    assert_eq!(apply_result.applied_migrations, vec!["0001"]);

    let status = runner.status().await.unwrap();
    assert_eq!(status.applied, vec!["0001"]);
    assert!(status.pending.is_empty());

    let rollback_result = runner.rollback(RollbackOptions::default()).await.unwrap();
    assert!(rollback_result.success, "rollback failed: {:?}", rollback_result.error);
    assert_eq!(rollback_result.rolled_back_migrations, vec!["0001"]);

    let status_after = runner.status().await.unwrap();
    assert!(status_after.applied.is_empty());

    runner.close();
}

/// Spec §8 scenario S6: rolling back to an explicit version leaves only
/// versions up to and including it in the ledger.
#[tokio::test]
async fn rollback_to_version_stops_at_target() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let dir = tempdir().unwrap();
    let schema_name = format!("migrate_test_rb_{}", std::process::id());
    let store = schema_migrate_core::MigrationStore::new(dir.path());
    let options = PlanOptions::new(schema_name.clone());

    let mut schema = Schema::new();
    for (version, ext_name) in [("0001", "pg_trgm"), ("0002", "pgcrypto"), ("0003", "citext")] {
        let mut next = schema.clone();
        next.add_extension(Extension::new(ext_name));
        let migration = generate_from_diff(&schema, &next, version, format!("add {ext_name}"), Utc::now(), &options).unwrap();
        store.write(&migration).await.unwrap();
        schema = next;
    }

    let config = RunnerConfig::new(url, dir.path()).with_schema_name(schema_name.clone());
    let runner = Runner::new(config).unwrap();
    runner.init().await.unwrap();
    runner.apply(ApplyOptions::default()).await.unwrap();

    let result = runner
        .rollback(RollbackOptions {
            to_version: Some("0001".to_string()),
            dry_run: false,
        })
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.rolled_back_migrations, vec!["0003", "0002"]);

    let status = runner.status().await.unwrap();
    assert_eq!(status.applied, vec!["0001"]);

    // clean up: roll back the last one too so the test schema doesn't linger.
    runner
        .rollback(RollbackOptions {
            to_version: None,
            dry_run: false,
        })
        .await
        .unwrap();
    runner.close();
}

/// Dry-run apply reports what would happen without leaving ledger rows.
#[tokio::test]
async fn dry_run_apply_does_not_record_ledger_rows() {
    let Some(url) = database_url() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let dir = tempdir().unwrap();
    let schema_name = format!("migrate_test_dry_{}", std::process::id());
    let to = fresh_install_schema();
    let migration = generate_from_diff(&Schema::new(), &to, "0001", "fresh install", Utc::now(), &PlanOptions::new(schema_name.clone())).unwrap();

    let store = schema_migrate_core::MigrationStore::new(dir.path());
    store.write(&migration).await.unwrap();

    let config = RunnerConfig::new(url, dir.path()).with_schema_name(schema_name.clone());
    let runner = Runner::new(config).unwrap();
    runner.init().await.unwrap();

    let result = runner.apply(ApplyOptions { dry_run: true }).await.unwrap();
    assert!(result.success);
    assert_eq!(result.applied_migrations, vec!["0001"]);

    let status = runner.status().await.unwrap();
    assert!(status.applied.is_empty(), "dry run must not leave a ledger row behind");
    assert_eq!(status.pending, vec!["0001"]);

    runner.close();
}
