//! `schema-migrate rollback` - reverse applied migrations.

use schema_migrate_core::{Runner, RollbackOptions};

use crate::cli::RollbackArgs;
use crate::config::runner_config;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Run the rollback command
pub async fn run(args: RollbackArgs) -> CliResult<()> {
    output::header("Rollback Migrations");

    match &args.to {
        Some(to_version) => output::kv("Rolling back to", to_version),
        None => output::kv("Rolling back", "most recent migration only"),
    }
    output::newline();

    let runner = Runner::new(runner_config(&args.connection))?;
    let result = runner
        .rollback(RollbackOptions {
            to_version: args.to.clone(),
            dry_run: args.dry_run,
        })
        .await?;

    for version in &result.rolled_back_migrations {
        output::list_item(&format!("rolled back {}", version));
    }

    if !result.success {
        let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
        return Err(CliError::Migration(reason));
    }

    if result.rolled_back_migrations.is_empty() {
        output::info("Nothing to roll back.");
        return Ok(());
    }

    output::newline();
    if args.dry_run {
        success(&format!(
            "Dry run complete - {} migration(s) would be rolled back.",
            result.rolled_back_migrations.len()
        ));
    } else {
        success(&format!(
            "Rolled back {} migration(s).",
            result.rolled_back_migrations.len()
        ));
    }

    Ok(())
}
