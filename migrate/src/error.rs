//! Error types for the migration engine.

use thiserror::Error;

/// Result type alias for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Errors that can occur while planning, storing, or running migrations.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Filesystem failure on store read/write (spec §7, "IO error").
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration JSON failed schema validation.
    #[error("malformed migration artifact at {path}: {reason}")]
    MalformedArtifact {
        /// Path of the offending artifact.
        path: String,
        /// Parse/validation failure reason.
        reason: String,
    },

    /// The planner detected a duplicate version or contradictory options.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// A step's SQL failed against the database.
    #[error("migration '{version}' step '{step}' failed: {source}\n  sql: {sql}")]
    SqlExecution {
        /// Migration version the failing step belongs to.
        version: String,
        /// Step name.
        step: String,
        /// The SQL that was executed.
        sql: String,
        /// Driver diagnostic.
        source: tokio_postgres::Error,
    },

    /// The ledger disagrees with the store about which versions exist.
    #[error("ledger conflict: version '{0}' is recorded as applied but has no artifact in the store")]
    LedgerConflict(String),

    /// Another process holds the advisory lock.
    #[error("another migration is already in progress (could not acquire advisory lock)")]
    LockUnavailable,

    /// A database driver error not tied to a specific migration step.
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Failure to build or acquire a pooled connection.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// General error not covered by a dedicated variant.
    #[error("{0}")]
    Other(String),
}

impl MigrateError {
    /// Build a [`MigrateError::MalformedArtifact`].
    pub fn malformed_artifact(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`MigrateError::InvalidPlan`].
    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }

    /// Build a [`MigrateError::Pool`].
    pub fn pool(msg: impl Into<String>) -> Self {
        Self::Pool(msg.into())
    }

    /// Build a [`MigrateError::Other`].
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error reflects a condition a caller can sensibly retry
    /// or treat as a no-op rather than a hard failure (spec §7).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::LockUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_unavailable_is_recoverable() {
        assert!(MigrateError::LockUnavailable.is_recoverable());
    }

    #[test]
    fn malformed_artifact_display_includes_path() {
        let err = MigrateError::malformed_artifact("001_init.json", "missing `version` field");
        assert!(err.to_string().contains("001_init.json"));
    }
}
