//! `schema-migrate migrate` - apply pending migrations.

use schema_migrate_core::{ApplyOptions, Runner};

use crate::cli::MigrateArgs;
use crate::config::runner_config;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Run the migrate command
pub async fn run(args: MigrateArgs) -> CliResult<()> {
    output::header("Apply Migrations");

    let runner = Runner::new(runner_config(&args.connection))?;
    runner.init().await?;

    let status = runner.status().await?;
    if status.pending.is_empty() {
        success("Already up to date - no pending migrations.");
        return Ok(());
    }

    output::list(&format!("{} pending migration(s):", status.pending.len()));
    for version in &status.pending {
        output::list_item(version);
    }
    output::newline();

    let result = runner.apply(ApplyOptions { dry_run: args.dry_run }).await?;

    for version in &result.applied_migrations {
        output::list_item(&format!("applied {}", version));
    }

    if !result.success {
        let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
        return Err(CliError::Migration(reason));
    }

    output::newline();
    if args.dry_run {
        success(&format!(
            "Dry run complete - {} migration(s) would be applied.",
            result.applied_migrations.len()
        ));
    } else {
        success(&format!("Applied {} migration(s).", result.applied_migrations.len()));
    }

    Ok(())
}
