//! # schema-migrate-model
//!
//! Data-model types describing a desired PostgreSQL database state: models
//! with typed fields, relations, indexes, enums, extensions, row-level
//! security settings, policies, triggers and roles.
//!
//! These types are plain values — this crate has no parser. A `Schema` is
//! built programmatically (or deserialized from JSON/TOML via `serde`) and
//! handed to the `schema-migrate-core` crate's planner.
//!
//! ## Example
//!
//! ```rust
//! use schema_migrate_model::{Schema, Model, Field, FieldType};
//!
//! let mut schema = Schema::new();
//! let mut user = Model::new("User");
//! user.add_field(Field::new("id", FieldType::uuid()).id());
//! user.add_field(Field::varchar("email", 255).unique());
//! schema.add_model(user);
//! ```

pub mod error;
pub mod extension;
pub mod field;
pub mod index;
pub mod model;
pub mod policy;
pub mod relation;
pub mod role;
pub mod rls;
pub mod schema;
pub mod schema_enum;
pub mod trigger;

pub use error::{SchemaError, SchemaResult};
pub use extension::Extension;
pub use field::{Field, FieldAttribute, FieldType, PrimitiveType};
pub use index::Index;
pub use model::Model;
pub use policy::{Policy, PolicyCommand};
pub use relation::{ReferentialAction, Relation, RelationType};
pub use role::{Privilege, Role, RolePrivilege};
pub use rls::RowLevelSecurity;
pub use schema::Schema;
pub use schema_enum::Enum;
pub use trigger::{Trigger, TriggerLevel};
