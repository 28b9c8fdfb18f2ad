//! The migration artifact: [`MigrationStep`] and [`Migration`].
//!
//! Spec §3, §9 ("Kind-erased step list"): the source represents a step as a
//! union with an `objectType` string; here that becomes a tagged enum so the
//! renderer and runner can exhaustively match on kind, while the `Serialize`/
//! `Deserialize` impls keep the on-disk JSON shape (`"objectType": "table"`)
//! unchanged for artifact compatibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a step creates, alters, or drops its target object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// The step's `sql` creates a new object.
    Create,
    /// The step's `sql` alters an existing object in place.
    Alter,
    /// The step's `sql` removes an object.
    Drop,
}

/// The kind of database object a [`MigrationStep`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    /// A `CREATE EXTENSION` declaration.
    Extension,
    /// An enum type.
    Enum,
    /// A table.
    Table,
    /// A single column on a table.
    Column,
    /// A foreign-key constraint.
    ForeignKey,
    /// An index.
    Index,
    /// A row-level-security flag (`ENABLE`/`DISABLE`/`FORCE`/`NO FORCE`).
    Rls,
    /// A row-level-security policy.
    Policy,
    /// A database role and its grants.
    Role,
    /// A trigger (and its backing function).
    Trigger,
}

/// A single reversible unit of schema change (spec §3).
///
/// `rollback_sql` MUST semantically invert `sql` — this is an invariant the
/// orchestrators are responsible for upholding, not something this type
/// enforces structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStep {
    /// Whether this step creates, alters, or drops its target.
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// The kind of object this step targets.
    pub object_type: ObjectKind,
    /// A unique, human-readable step name (spec §4.2, various naming rules).
    pub name: String,
    /// The forward SQL to apply.
    pub sql: String,
    /// The SQL that undoes `sql`.
    pub rollback_sql: String,
}

impl MigrationStep {
    /// Build a step.
    pub fn new(
        step_type: StepType,
        object_type: ObjectKind,
        name: impl Into<String>,
        sql: impl Into<String>,
        rollback_sql: impl Into<String>,
    ) -> Self {
        Self {
            step_type,
            object_type,
            name: name.into(),
            sql: sql.into(),
            rollback_sql: rollback_sql.into(),
        }
    }

    /// The step with `sql`/`rollback_sql` swapped and its `step_type`
    /// inverted (`create` <-> `drop`; `alter` stays `alter`). Used to build
    /// a migration's rollback counterpart.
    pub fn inverted(&self) -> MigrationStep {
        let step_type = match self.step_type {
            StepType::Create => StepType::Drop,
            StepType::Drop => StepType::Create,
            StepType::Alter => StepType::Alter,
        };
        MigrationStep {
            step_type,
            object_type: self.object_type,
            name: self.name.clone(),
            sql: self.rollback_sql.clone(),
            rollback_sql: self.sql.clone(),
        }
    }
}

/// An ordered, versioned, reversible sequence of [`MigrationStep`]s (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    /// Lexicographically-sortable version identifier.
    pub version: String,
    /// Free-text description.
    pub description: String,
    /// ISO-8601 creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Steps, in application order.
    pub steps: Vec<MigrationStep>,
}

impl Migration {
    /// Build a migration with the given version/description/steps, stamped
    /// with the given timestamp (callers own the clock so generation stays
    /// a pure function of its inputs).
    pub fn new(
        version: impl Into<String>,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        steps: Vec<MigrationStep>,
    ) -> Self {
        Self {
            version: version.into(),
            description: description.into(),
            timestamp,
            steps,
        }
    }

    /// Whether this migration has no steps (spec §8 invariant 2,
    /// "idempotent plan": `plan(S, S) == empty`).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Build the migration that exactly reverses this one: steps in
    /// reverse order, each with `sql`/`rollback_sql` swapped (spec §4.3,
    /// "Rollback migration").
    pub fn inverse(&self) -> Migration {
        let steps = self.steps.iter().rev().map(MigrationStep::inverted).collect();
        Migration {
            version: self.version.clone(),
            description: format!("rollback of {}", self.description),
            timestamp: self.timestamp,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(step_type: StepType, name: &str) -> MigrationStep {
        MigrationStep::new(step_type, ObjectKind::Table, name, "UP", "DOWN")
    }

    #[test]
    fn inverted_swaps_sql_and_type() {
        let s = step(StepType::Create, "User");
        let inv = s.inverted();
        assert_eq!(inv.step_type, StepType::Drop);
        assert_eq!(inv.sql, "DOWN");
        assert_eq!(inv.rollback_sql, "UP");
    }

    #[test]
    fn alter_stays_alter_when_inverted() {
        let s = step(StepType::Alter, "User_add_name");
        assert_eq!(s.inverted().step_type, StepType::Alter);
    }

    #[test]
    fn migration_inverse_reverses_step_order() {
        let m = Migration::new(
            "001",
            "create two tables",
            Utc::now(),
            vec![step(StepType::Create, "A"), step(StepType::Create, "B")],
        );
        let inv = m.inverse();
        assert_eq!(inv.steps[0].name, "B");
        assert_eq!(inv.steps[1].name, "A");
        assert_eq!(inv.steps[0].step_type, StepType::Drop);
    }

    #[test]
    fn empty_migration_is_empty() {
        let m = Migration::new("001", "noop", Utc::now(), vec![]);
        assert!(m.is_empty());
    }
}
