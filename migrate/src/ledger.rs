//! The ledger table and advisory lock (spec §4.5, component C5).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use deadpool_postgres::GenericClient;
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};

/// Recorded version, description, and apply time for one migration (spec
/// §4.5's `LedgerRecord`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// The migration version this row tracks.
    pub version: String,
    /// The migration's free-text description at the time it was applied.
    pub description: String,
}

/// The ledger table tracking which migration versions have been applied to
/// a particular `<schema>.<table>` (spec §6, default `public.schema_migrations`).
pub struct Ledger {
    schema_name: String,
    table_name: String,
}

impl Ledger {
    /// Point a ledger at `<schema_name>.<table_name>`.
    pub fn new(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
        }
    }

    fn qualified(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema_name, self.table_name)
    }

    /// `CREATE TABLE IF NOT EXISTS` for the ledger (spec §4.5).
    pub async fn ensure_table(&self, client: &impl GenericClient) -> MigrateResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n\
             \x20\x20version TEXT PRIMARY KEY,\n\
             \x20\x20description TEXT NOT NULL,\n\
             \x20\x20applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\n\
             )",
            self.qualified()
        );
        client.batch_execute(&sql).await?;
        Ok(())
    }

    /// Every applied version, in ascending order.
    pub async fn applied_versions(&self, client: &impl GenericClient) -> MigrateResult<Vec<LedgerRecord>> {
        let sql = format!("SELECT version, description FROM {} ORDER BY version ASC", self.qualified());
        let rows = client.query(&sql, &[]).await?;
        Ok(rows
            .into_iter()
            .map(|row| LedgerRecord {
                version: row.get("version"),
                description: row.get("description"),
            })
            .collect())
    }

    /// Record a version as applied. Intended to run inside the same
    /// transaction as the DDL it records (spec §4.3's transactionality
    /// invariant).
    pub async fn record(&self, client: &impl GenericClient, version: &str, description: &str) -> MigrateResult<()> {
        let sql = format!(
            "INSERT INTO {} (version, description) VALUES ($1, $2)",
            self.qualified()
        );
        client.execute(&sql, &[&version, &description]).await?;
        Ok(())
    }

    /// Delete a version's ledger row (used by rollback).
    pub async fn forget(&self, client: &impl GenericClient, version: &str) -> MigrateResult<()> {
        let sql = format!("DELETE FROM {} WHERE version = $1", self.qualified());
        client.execute(&sql, &[&version]).await?;
        Ok(())
    }
}

/// Derive a stable `pg_advisory_lock` key from the ledger's `<schema>.<table>`
/// so migrations against different schemas never contend for the same lock
/// (spec §5, "a session-level advisory lock on a well-known key").
fn lock_key(schema_name: &str, table_name: &str) -> i64 {
    let mut hasher = DefaultHasher::new();
    schema_name.hash(&mut hasher);
    table_name.hash(&mut hasher);
    (hasher.finish() as i64).wrapping_abs()
}

/// RAII guard around a session-level `pg_advisory_lock`. Releasing the lock
/// requires the same connection that acquired it, so the guard borrows it
/// for its lifetime; dropping the guard without calling
/// [`MigrationLock::release`] leaves the lock held until the connection
/// closes, matching PostgreSQL's own session-scoped advisory lock semantics.
pub struct MigrationLock<'a, C: GenericClient> {
    client: &'a C,
    key: i64,
    released: bool,
}

impl<'a, C: GenericClient> MigrationLock<'a, C> {
    /// Try to acquire the advisory lock for `<schema_name>.<table_name>`
    /// without blocking. Returns [`MigrateError::LockUnavailable`] if
    /// another session already holds it.
    pub async fn acquire(client: &'a C, schema_name: &str, table_name: &str) -> MigrateResult<MigrationLock<'a, C>> {
        let key = lock_key(schema_name, table_name);
        let row = client.query_one("SELECT pg_try_advisory_lock($1)", &[&key]).await?;
        let acquired: bool = row.get(0);
        if !acquired {
            return Err(MigrateError::LockUnavailable);
        }
        debug!(key, "acquired migration advisory lock");
        Ok(MigrationLock {
            client,
            key,
            released: false,
        })
    }

    /// Release the lock explicitly, surfacing any database error. Called
    /// automatically (best-effort, errors dropped) if the guard is dropped
    /// without this having run.
    pub async fn release(mut self) -> MigrateResult<()> {
        self.client.query_one("SELECT pg_advisory_unlock($1)", &[&self.key]).await?;
        self.released = true;
        Ok(())
    }
}

impl<'a, C: GenericClient> Drop for MigrationLock<'a, C> {
    fn drop(&mut self) {
        if !self.released {
            debug!(key = self.key, "migration advisory lock guard dropped without explicit release");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_key_differs_across_schemas() {
        let a = lock_key("public", "schema_migrations");
        let b = lock_key("tenant_a", "schema_migrations");
        assert_ne!(a, b);
    }

    #[test]
    fn lock_key_is_stable() {
        assert_eq!(
            lock_key("public", "schema_migrations"),
            lock_key("public", "schema_migrations")
        );
    }
}
