//! Translate parsed CLI arguments into a [`RunnerConfig`].

use schema_migrate_core::RunnerConfig;

use crate::cli::ConnectionArgs;

/// Build a [`RunnerConfig`] from the connection arguments shared by every
/// subcommand (the CLI's flags/env vars are the only source of this
/// configuration; there is no `schema-migrate.toml` project file).
pub fn runner_config(args: &ConnectionArgs) -> RunnerConfig {
    RunnerConfig::new(args.database_url.clone(), args.migrations_dir.clone())
        .with_schema_name(args.schema_name.clone())
        .with_migrations_table_name(args.migrations_table.clone())
}

/// Install a `tracing` subscriber at `debug` level when `--verbose`/`VERBOSE`
/// is set, `info` level otherwise.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
