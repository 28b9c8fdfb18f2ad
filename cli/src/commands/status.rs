//! `schema-migrate status` - show applied and pending migration versions.

use schema_migrate_core::Runner;

use crate::cli::ConnectionArgs;
use crate::config::runner_config;
use crate::error::CliResult;
use crate::output::{self, style_pending, style_success};

/// Run the status command
pub async fn run(args: ConnectionArgs) -> CliResult<()> {
    output::header("Migration Status");

    let runner = Runner::new(runner_config(&args))?;
    let status = runner.status().await?;

    if status.applied.is_empty() && status.pending.is_empty() {
        output::info("No migrations found in the store.");
        return Ok(());
    }

    if !status.applied.is_empty() {
        output::section("Applied");
        for version in &status.applied {
            output::list_item(&format!("{} {}", style_success("✓"), version));
        }
        output::newline();
    }

    if !status.pending.is_empty() {
        output::section("Pending");
        for version in &status.pending {
            output::list_item(&format!("{} {}", style_pending("○"), version));
        }
        output::newline();
    }

    output::kv("Applied", &status.applied.len().to_string());
    output::kv("Pending", &status.pending.len().to_string());

    Ok(())
}
