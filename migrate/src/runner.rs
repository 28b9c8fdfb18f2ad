//! The runner: transactional apply/rollback against a live database (spec
//! §4.6, component C6).

use std::path::PathBuf;

use deadpool_postgres::GenericClient;

use crate::db::{ConnectionConfig, RunnerPool};
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{Ledger, MigrationLock};
use crate::migration::Migration;
use crate::store::MigrationStore;

/// Runner configuration (spec §6's `{connectionString, migrationsDir,
/// schemaName, migrationsTableName}`).
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// `postgres://` connection string.
    pub connection_string: String,
    /// Directory holding migration artifacts.
    pub migrations_dir: PathBuf,
    /// Target schema (namespace) name.
    pub schema_name: String,
    /// Ledger table name within `schema_name`.
    pub migrations_table_name: String,
    /// Maximum pool size for the runner's connection pool.
    pub max_connections: usize,
}

impl RunnerConfig {
    /// Build a config from a connection string and migrations directory,
    /// defaulting `schemaName` to `"public"` and `migrationsTableName` to
    /// `"schema_migrations"` (spec §6).
    pub fn new(connection_string: impl Into<String>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            connection_string: connection_string.into(),
            migrations_dir: migrations_dir.into(),
            schema_name: "public".to_string(),
            migrations_table_name: "schema_migrations".to_string(),
            max_connections: 5,
        }
    }

    /// Override the target schema name.
    pub fn with_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = schema_name.into();
        self
    }

    /// Override the ledger table name.
    pub fn with_migrations_table_name(mut self, name: impl Into<String>) -> Self {
        self.migrations_table_name = name.into();
        self
    }
}

/// Options for [`Runner::apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Plan and execute every step, but roll back the transaction instead
    /// of committing, reporting what *would* have been applied.
    pub dry_run: bool,
}

/// Options for [`Runner::rollback`].
#[derive(Debug, Clone, Default)]
pub struct RollbackOptions {
    /// Roll back to (but not past) this version. `None` rolls back only
    /// the single most recently applied migration.
    pub to_version: Option<String>,
    /// Plan and execute every rollback step, but roll back the transaction
    /// instead of committing.
    pub dry_run: bool,
}

/// Outcome of [`Runner::apply`] or [`Runner::rollback`].
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Whether every selected migration applied/rolled back successfully.
    pub success: bool,
    /// Versions applied, in the order they were applied.
    pub applied_migrations: Vec<String>,
    /// Versions rolled back, in the order they were rolled back.
    pub rolled_back_migrations: Vec<String>,
    /// The first failure encountered, if any.
    pub error: Option<String>,
}

/// The set of versions known to the store but not yet recorded in the
/// ledger, and vice versa (spec §4.6's `status()`).
#[derive(Debug, Clone, Default)]
pub struct Status {
    /// Versions present in both the store and the ledger.
    pub applied: Vec<String>,
    /// Versions present in the store but not yet applied.
    pub pending: Vec<String>,
}

/// Loads persisted migrations, compares them against the ledger, and
/// applies or reverses them transactionally (spec §4.6).
pub struct Runner {
    pool: RunnerPool,
    store: MigrationStore,
    ledger: Ledger,
    schema_name: String,
    migrations_table_name: String,
}

impl Runner {
    /// Build a runner from `config`.
    pub fn new(config: RunnerConfig) -> MigrateResult<Self> {
        let connection = ConnectionConfig::from_url(config.connection_string.clone())?
            .with_max_connections(config.max_connections)
            .with_schema(config.schema_name.clone());
        let pool = RunnerPool::connect(connection)?;
        let store = MigrationStore::new(config.migrations_dir);
        let ledger = Ledger::new(config.schema_name.clone(), config.migrations_table_name.clone());

        Ok(Self {
            pool,
            store,
            ledger,
            schema_name: config.schema_name,
            migrations_table_name: config.migrations_table_name,
        })
    }

    /// Ensure the target schema and ledger table exist. Idempotent.
    pub async fn init(&self) -> MigrateResult<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(&format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", self.schema_name))
            .await?;
        self.ledger.ensure_table(&client).await?;
        Ok(())
    }

    /// Join the store's known versions with the ledger's applied versions.
    pub async fn status(&self) -> MigrateResult<Status> {
        let client = self.pool.get().await?;
        let applied: std::collections::HashSet<String> = self
            .ledger
            .applied_versions(&client)
            .await?
            .into_iter()
            .map(|r| r.version)
            .collect();

        let mut status = Status::default();
        for version in self.store.list().await? {
            let version = leading_version(&version);
            if applied.contains(&version) {
                status.applied.push(version);
            } else {
                status.pending.push(version);
            }
        }
        status.applied.sort();
        status.pending.sort();
        Ok(status)
    }

    /// Apply every pending migration in ascending version order (spec
    /// §4.6's `apply()`).
    pub async fn apply(&self, options: ApplyOptions) -> MigrateResult<RunResult> {
        // The advisory lock is session-scoped, so it's held on its own
        // connection, separate from the one running migration transactions
        // (which needs a mutable borrow for `transaction()`).
        let lock_client = self.pool.get().await?;
        let lock = MigrationLock::acquire(&lock_client, &self.schema_name, self.ledger_table_for_lock()).await?;
        let mut client = self.pool.get().await?;

        let status = self.status().await?;
        let mut result = RunResult {
            success: true,
            ..Default::default()
        };

        for version in status.pending {
            let Some(migration) = self.store.read(&version).await? else {
                continue;
            };

            let txn = client.transaction().await.map_err(MigrateError::Database)?;
            match self.apply_one(&txn, &migration).await {
                Ok(()) => {
                    if options.dry_run {
                        txn.rollback().await.map_err(MigrateError::Database)?;
                    } else {
                        txn.commit().await.map_err(MigrateError::Database)?;
                    }
                    result.applied_migrations.push(migration.version.clone());
                }
                Err(e) => {
                    txn.rollback().await.ok();
                    result.success = false;
                    result.error = Some(e.to_string());
                    break;
                }
            }
        }

        lock.release().await?;
        Ok(result)
    }

    async fn apply_one(&self, txn: &deadpool_postgres::Transaction<'_>, migration: &Migration) -> MigrateResult<()> {
        for step in &migration.steps {
            txn.batch_execute(&step.sql).await.map_err(|source| MigrateError::SqlExecution {
                version: migration.version.clone(),
                step: step.name.clone(),
                sql: step.sql.clone(),
                source,
            })?;
        }
        self.ledger.record(txn, &migration.version, &migration.description).await?;
        Ok(())
    }

    /// Roll back applied migrations strictly newer than `to_version` (or
    /// just the most recent one if omitted), in descending version order
    /// (spec §4.6's `rollback()`).
    pub async fn rollback(&self, options: RollbackOptions) -> MigrateResult<RunResult> {
        let lock_client = self.pool.get().await?;
        let lock = MigrationLock::acquire(&lock_client, &self.schema_name, self.ledger_table_for_lock()).await?;
        let mut client = self.pool.get().await?;

        let applied = self.ledger.applied_versions(&client).await?;
        let mut versions: Vec<String> = applied.into_iter().map(|r| r.version).collect();
        versions.sort();

        let targets: Vec<String> = match &options.to_version {
            Some(to_version) => versions.into_iter().filter(|v| v > to_version).rev().collect(),
            None => versions.into_iter().rev().take(1).collect(),
        };

        let mut result = RunResult {
            success: true,
            ..Default::default()
        };

        for version in targets {
            let Some(migration) = self.store.read(&version).await? else {
                result.success = false;
                result.error = Some(format!("ledger contains version '{version}' with no artifact in the store"));
                break;
            };

            let txn = client.transaction().await.map_err(MigrateError::Database)?;
            match self.rollback_one(&txn, &migration).await {
                Ok(()) => {
                    if options.dry_run {
                        txn.rollback().await.map_err(MigrateError::Database)?;
                    } else {
                        txn.commit().await.map_err(MigrateError::Database)?;
                    }
                    result.rolled_back_migrations.push(version);
                }
                Err(e) => {
                    txn.rollback().await.ok();
                    result.success = false;
                    result.error = Some(e.to_string());
                    break;
                }
            }
        }

        lock.release().await?;
        Ok(result)
    }

    async fn rollback_one(&self, txn: &deadpool_postgres::Transaction<'_>, migration: &Migration) -> MigrateResult<()> {
        for step in migration.steps.iter().rev() {
            txn.batch_execute(&step.rollback_sql)
                .await
                .map_err(|source| MigrateError::SqlExecution {
                    version: migration.version.clone(),
                    step: step.name.clone(),
                    sql: step.rollback_sql.clone(),
                    source,
                })?;
        }
        self.ledger.forget(txn, &migration.version).await?;
        Ok(())
    }

    fn ledger_table_for_lock(&self) -> &str {
        &self.migrations_table_name
    }

    /// Release the runner's database resources.
    pub fn close(&self) {
        self.pool.close();
    }
}

/// The leading `<version>` component of a store filename stem
/// (`<version>_<slug>` or bare `<version>`, spec §6's filename regex).
fn leading_version(stem: &str) -> String {
    stem.split_once('_').map(|(v, _)| v.to_string()).unwrap_or_else(|| stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_version_strips_slug() {
        assert_eq!(leading_version("0001_create-users-table"), "0001");
        assert_eq!(leading_version("0001"), "0001");
    }

    #[test]
    fn runner_config_defaults_schema_and_table() {
        let config = RunnerConfig::new("postgres://localhost/app", "./migrations");
        assert_eq!(config.schema_name, "public");
        assert_eq!(config.migrations_table_name, "schema_migrations");
    }
}
