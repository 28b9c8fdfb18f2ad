//! Migration planner (spec §4.3, component C3).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use schema_migrate_model::Schema;
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};
use crate::migration::Migration;
use crate::orchestrators::{enum_type, extension, index, policy, relation, rls, role, table, trigger};

/// Which object kinds to include when planning (spec §4.3). All default to
/// `true`; `schema_name` defaults to `"public"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Target PostgreSQL schema (namespace) name.
    pub schema_name: String,
    /// Whether to diff/plan extensions.
    pub include_extensions: bool,
    /// Whether to diff/plan enums.
    pub include_enums: bool,
    /// Whether to diff/plan tables and columns.
    pub include_tables: bool,
    /// Whether to diff/plan foreign-key constraints.
    pub include_constraints: bool,
    /// Whether to diff/plan indexes.
    pub include_indexes: bool,
    /// Whether to diff/plan row-level-security flags.
    pub include_rls: bool,
    /// Whether to diff/plan roles and grants.
    pub include_roles: bool,
    /// Whether to diff/plan policies.
    pub include_policies: bool,
    /// Whether to diff/plan triggers.
    pub include_triggers: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            schema_name: "public".to_string(),
            include_extensions: true,
            include_enums: true,
            include_tables: true,
            include_constraints: true,
            include_indexes: true,
            include_rls: true,
            include_roles: true,
            include_policies: true,
            include_triggers: true,
        }
    }
}

impl PlanOptions {
    /// Default options targeting the given schema name.
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            ..Default::default()
        }
    }
}

fn enum_name_set(schema: &Schema) -> HashSet<String> {
    schema.enums.keys().cloned().collect()
}

/// Generate the forward migration taking the database from `from` to `to`
/// (spec §4.3, "Generating from a diff"). An empty `from` means a fresh
/// database (spec S1). Steps are emitted in the fixed 13-tier dependency
/// order described in spec §4.3: each tier's added/updated/removed halves
/// run back to back (removals for constraints, indexes, policies and
/// triggers happen within their own tier, ahead of the table-removal tier,
/// since nothing downstream depends on them once added/updated is settled).
pub fn generate_from_diff(
    from: &Schema,
    to: &Schema,
    version: impl Into<String>,
    description: impl Into<String>,
    timestamp: DateTime<Utc>,
    options: &PlanOptions,
) -> MigrateResult<Migration> {
    let version = version.into();
    if version.is_empty() {
        return Err(MigrateError::invalid_plan("migration version must not be empty"));
    }

    let schema_name = &options.schema_name;
    let enum_names = enum_name_set(to);
    let mut steps = Vec::new();

    // Tier 1: extensions added/updated.
    if options.include_extensions {
        let diff = extension::compare(from, to);
        steps.extend(extension::plan_added(&diff));
    }

    // Tier 2: enums added/updated.
    if options.include_enums {
        let diff = enum_type::compare(from, to);
        steps.extend(enum_type::plan_added(schema_name, &diff));
    }

    // Tier 3: roles (CREATE/DROP ROLE shape only; grants deferred to tier 8).
    if options.include_roles {
        let diff = role::compare(from, to);
        steps.extend(role::plan_shape(schema_name, &diff));
    }

    // Tier 4: tables added.
    if options.include_tables {
        let diff = table::compare(from, to);
        steps.extend(table::plan_added(schema_name, &diff, &enum_names));
    }

    // Tier 5: columns added/updated/removed, per existing table.
    if options.include_tables {
        let diff = table::compare(from, to);
        steps.extend(table::plan_columns(schema_name, &diff, &enum_names));
    }

    // Tier 6: foreign keys added/updated/removed, after all tables exist.
    if options.include_constraints {
        let diff = relation::compare(from, to);
        steps.extend(relation::plan_added(schema_name, &diff));
        steps.extend(relation::plan_removed(schema_name, &diff));
    }

    // Tier 7: indexes.
    if options.include_indexes {
        let diff = index::compare(from, to);
        steps.extend(index::plan_added(schema_name, &diff));
        steps.extend(index::plan_removed(schema_name, &diff));
    }

    // Tier 8: role grants for added/updated roles.
    if options.include_roles {
        let diff = role::compare(from, to);
        steps.extend(role::plan_grants(schema_name, &diff));
    }

    // Tier 9: RLS flags.
    if options.include_rls {
        let diffs = rls::compare(from, to);
        steps.extend(rls::plan(schema_name, &diffs));
    }

    // Tier 10: policies.
    if options.include_policies {
        let diff = policy::compare(from, to);
        steps.extend(policy::plan_added(schema_name, &diff));
        steps.extend(policy::plan_removed(schema_name, &diff));
    }

    // Tier 11: triggers.
    if options.include_triggers {
        let diff = trigger::compare(from, to);
        steps.extend(trigger::plan_added(schema_name, &diff));
        steps.extend(trigger::plan_removed(schema_name, &diff));
    }

    // Tier 12: tables removed, after every constraint/index/policy/trigger
    // that referenced them is already gone.
    if options.include_tables {
        let diff = table::compare(from, to);
        steps.extend(table::plan_removed(schema_name, &diff, &enum_names));
    }

    // Tier 13: enums removed, then extensions removed.
    if options.include_enums {
        let diff = enum_type::compare(from, to);
        steps.extend(enum_type::plan_removed(schema_name, &diff));
    }
    if options.include_extensions {
        let diff = extension::compare(from, to);
        steps.extend(extension::plan_removed(&diff));
    }

    debug!(
        schema = %schema_name,
        version = %version,
        step_count = steps.len(),
        "planned migration"
    );

    Ok(Migration::new(version, description, timestamp, steps))
}

/// Generate the full rollback-to-empty migration for `schema`, equivalent to
/// migrating from `schema` down to an empty schema (spec §4.3, used by the
/// runner when rolling back the very first applied version).
pub fn generate_teardown(
    schema: &Schema,
    version: impl Into<String>,
    description: impl Into<String>,
    timestamp: DateTime<Utc>,
    options: &PlanOptions,
) -> MigrateResult<Migration> {
    generate_from_diff(schema, &Schema::new(), version, description, timestamp, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_schemas_plan_empty() {
        let schema = Schema::new();
        let m = generate_from_diff(&schema, &schema, "001", "noop", Utc::now(), &PlanOptions::default()).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn empty_version_is_rejected() {
        let schema = Schema::new();
        let result = generate_from_diff(&schema, &schema, "", "x", Utc::now(), &PlanOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn fresh_database_orders_extensions_before_tables() {
        use schema_migrate_model::{Extension, Field, FieldType, Model};

        let mut to = Schema::new();
        to.add_extension(Extension::new("pgcrypto"));
        let mut model = Model::new("User");
        model.add_field(Field::new("id", FieldType::uuid()).id());
        to.add_model(model);

        let m = generate_from_diff(&Schema::new(), &to, "001", "init", Utc::now(), &PlanOptions::default()).unwrap();
        let ext_pos = m.steps.iter().position(|s| s.sql.contains("CREATE EXTENSION")).unwrap();
        let table_pos = m.steps.iter().position(|s| s.sql.contains("CREATE TABLE")).unwrap();
        assert!(ext_pos < table_pos);
    }
}
