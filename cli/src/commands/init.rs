//! `schema-migrate init` - ensure the target schema and ledger table exist.

use schema_migrate_core::Runner;

use crate::cli::ConnectionArgs;
use crate::config::runner_config;
use crate::error::CliResult;
use crate::output::{self, success};

/// Run the init command
pub async fn run(args: ConnectionArgs) -> CliResult<()> {
    output::header("Initialize Migration Schema");

    output::kv("Schema", &args.schema_name);
    output::kv("Ledger table", &args.migrations_table);
    output::newline();

    let runner = Runner::new(runner_config(&args))?;
    runner.init().await?;

    success("Schema and ledger table are ready.");
    Ok(())
}
