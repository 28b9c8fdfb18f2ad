//! Operational CLI for pg-schema-migrate.
//!
//! A thin wrapper over `schema-migrate-core`'s [`Runner`](schema_migrate_core::Runner):
//! `init`, `status`, `migrate`, and `rollback`. It loads connection and
//! runner configuration from flags/environment and does not diff or preview
//! schemas itself.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
