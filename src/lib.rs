//! # pg-schema-migrate
//!
//! A declarative schema migration engine for PostgreSQL.
//!
//! Describe the database you want as a [`Schema`] value — models, enums,
//! extensions, roles, relations, indexes, row-level security, policies and
//! triggers — and this crate diffs it against a prior state, plans a
//! reversible [`Migration`], persists it to a filesystem store, and applies
//! or rolls it back transactionally against a live database while tracking
//! applied versions in a ledger table.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use pg_schema_migrate::prelude::*;
//!
//! let plan = generate_from_diff(&from_schema, &to_schema, "0001", "create users", now, &PlanOptions::default())?;
//!
//! let store = MigrationStore::new("./migrations");
//! store.write(&plan)?;
//!
//! let runner = Runner::new(RunnerConfig::new(database_url, "./migrations"))?;
//! runner.init().await?;
//! let result = runner.apply(ApplyOptions::default()).await?;
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

/// Schema data-model types (Model, Field, Relation, Enum, ...).
pub mod schema {
    pub use schema_migrate_model::*;
}

/// Diffing, planning, storage and transactional execution.
pub mod migrate {
    pub use schema_migrate_core::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::migrate::{
        ApplyOptions, Migration, MigrationStep, MigrationStore, PlanOptions, RollbackOptions,
        Runner, RunnerConfig, generate_from_diff, generate_teardown,
    };
    pub use crate::schema::Schema;
}

pub use migrate::MigrateError;
pub use schema::Schema;
