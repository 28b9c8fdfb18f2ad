//! CLI error types and result alias.

use miette::Diagnostic;
use schema_migrate_core::MigrateError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(schema_migrate::io))]
    Io(#[from] std::io::Error),

    /// Error surfaced from the migration engine
    #[error(transparent)]
    #[diagnostic(code(schema_migrate::engine))]
    Engine(#[from] MigrateError),

    /// A migration run completed but reported failure
    #[error("migration error: {0}")]
    #[diagnostic(code(schema_migrate::migration))]
    Migration(String),
}
