//! # schema-migrate-core
//!
//! Declarative schema migration engine for PostgreSQL.
//!
//! This crate compares two [`schema_migrate_model::Schema`] values (or one
//! against an empty baseline) and produces an ordered, reversible sequence
//! of SQL steps, persists that sequence as a versioned JSON artifact, and
//! applies or rolls it back transactionally against a live database while
//! tracking applied versions in a ledger table.
//!
//! ## Architecture
//!
//! ```text
//! Schema (from) ─┐
//!                 ├─▶ Orchestrators ─▶ Renderer ─▶ Planner ─▶ Migration
//! Schema (to)   ─┘                                              │
//!                                                                ▼
//!                                              Store.write   Runner.apply
//!                                                   │              │
//!                                                   ▼              ▼
//!                                              <dir>/*.json    Ledger + DB
//! ```
//!
//! - [`orchestrators`] hold one module per object kind (extensions, enums,
//!   tables/columns, foreign keys, indexes, row-level-security, policies,
//!   roles, triggers), each diffing that kind between two schemas and
//!   rendering its steps.
//! - [`render`] holds the pure SQL string builders the orchestrators call.
//! - [`plan`] composes every orchestrator's output into one [`Migration`]
//!   in the fixed tier order the database's dependency graph requires.
//! - [`store`] persists and loads migration artifacts on the filesystem.
//! - [`ledger`] tracks applied versions in a database table and guards
//!   concurrent runs with a PostgreSQL advisory lock.
//! - [`db`] owns the connection pool.
//! - [`runner`] composes store, ledger, and db to provide `init`/`status`/
//!   `apply`/`rollback`.

pub mod db;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod orchestrators;
pub mod plan;
pub mod render;
pub mod runner;
pub mod store;

pub use db::{ConnectionConfig, RunnerPool};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerRecord, MigrationLock};
pub use migration::{Migration, MigrationStep, ObjectKind, StepType};
pub use plan::{generate_from_diff, generate_teardown, PlanOptions};
pub use runner::{ApplyOptions, Runner, RunnerConfig, RollbackOptions, RunResult, Status};
pub use store::MigrationStore;
