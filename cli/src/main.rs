//! schema-migrate - operational CLI for pg-schema-migrate.

use clap::Parser;

use schema_migrate_cli::cli::{Cli, Command};
use schema_migrate_cli::commands;
use schema_migrate_cli::config::init_tracing;
use schema_migrate_cli::error::CliResult;
use schema_migrate_cli::output;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Command::Init(args) | Command::Status(args) => args.verbose,
        Command::Migrate(args) => args.connection.verbose,
        Command::Rollback(args) => args.connection.verbose,
    };
    init_tracing(verbose);

    match cli.command {
        Command::Init(args) => commands::init::run(args).await,
        Command::Status(args) => commands::status::run(args).await,
        Command::Migrate(args) => commands::migrate::run(args).await,
        Command::Rollback(args) => commands::rollback::run(args).await,
    }
}
