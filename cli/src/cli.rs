//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pg-schema-migrate CLI — apply and inspect declarative PostgreSQL migrations.
#[derive(Parser, Debug)]
#[command(name = "schema-migrate")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Operational CLI for pg-schema-migrate", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands. This surface is deliberately thin: it wraps the
/// runner's lifecycle operations and does not diff or preview schemas — see
/// the project's design notes for why schema preview stays out of core scope.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ensure the target schema and ledger table exist
    Init(ConnectionArgs),

    /// Show applied and pending migration versions
    Status(ConnectionArgs),

    /// Apply all pending migrations, in ascending version order
    Migrate(MigrateArgs),

    /// Roll back applied migrations, in descending version order
    Rollback(RollbackArgs),
}

/// Connection and runner configuration shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Directory holding migration artifacts
    #[arg(long, env = "MIGRATIONS_DIR", default_value = "./migrations")]
    pub migrations_dir: PathBuf,

    /// Target schema (namespace) name
    #[arg(long, env = "SCHEMA_NAME", default_value = "public")]
    pub schema_name: String,

    /// Ledger table name within the target schema
    #[arg(long, env = "MIGRATIONS_TABLE", default_value = "schema_migrations")]
    pub migrations_table: String,

    /// Emit debug-level tracing to stderr
    #[arg(short, long, env = "VERBOSE")]
    pub verbose: bool,
}

/// Arguments for the `migrate` command.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Plan and execute every step, but roll back instead of committing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `rollback` command.
#[derive(Args, Debug)]
pub struct RollbackArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Roll back to (but not past) this version; omit to roll back only the
    /// most recently applied migration
    #[arg(long)]
    pub to: Option<String>,

    /// Plan and execute every rollback step, but roll back instead of committing
    #[arg(long)]
    pub dry_run: bool,
}
