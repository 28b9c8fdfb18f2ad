//! Table/field orchestrator (spec §4.2.3).

use std::collections::HashSet;

use schema_migrate_model::{Field, Model, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// Per-field added/removed/updated diff for one model.
#[derive(Debug, Clone, Default)]
pub struct FieldDiff {
    /// Fields present on `to` but not `from`.
    pub added: Vec<Field>,
    /// Fields present on `from` but not `to`.
    pub removed: Vec<Field>,
    /// Fields present on both whose comparable facets differ.
    pub updated: Vec<(Field, Field)>,
}

/// The field-level diff for one model that exists in both `from` and `to`,
/// plus informational flags the relation/RLS/policy orchestrators own the
/// actual steps for (spec §4.2.3).
#[derive(Debug, Clone)]
pub struct ModelDiff {
    /// Model name.
    pub model: String,
    /// Field-level diff.
    pub fields: FieldDiff,
    /// Whether the model's `relations` set differs (informational only).
    pub relations_changed: bool,
    /// Whether the model's RLS settings differ (informational only).
    pub rls_changed: bool,
    /// Whether the model's policies differ (informational only).
    pub policies_changed: bool,
}

impl ModelDiff {
    fn is_empty(&self) -> bool {
        self.fields.added.is_empty()
            && self.fields.removed.is_empty()
            && self.fields.updated.is_empty()
    }
}

/// Full table diff: models added, models removed, and per-model field
/// diffs for models present on both sides.
#[derive(Debug, Clone, Default)]
pub struct TableDiff {
    /// New models.
    pub added: Vec<Model>,
    /// Removed models.
    pub removed: Vec<Model>,
    /// Field diffs for models present in both schemas.
    pub updated: Vec<ModelDiff>,
}

/// Field-level diff feeding the `ALTER COLUMN` path (spec §4.2.3). Uses
/// [`Field::plain_differs_from`], not [`Field::differs_from`], so that
/// attribute-only changes (`@unique`/`@id`) don't surface here — they have
/// no `ALTER COLUMN` rendering and are instead picked up by the index
/// orchestrator (unique) and table-creation primary key rendering (id).
fn diff_fields(from: &Model, to: &Model) -> FieldDiff {
    let mut diff = FieldDiff::default();
    for (name, to_field) in &to.fields {
        match from.fields.get(name) {
            None => diff.added.push(to_field.clone()),
            Some(from_field) => {
                if from_field.plain_differs_from(to_field) {
                    diff.updated.push((from_field.clone(), to_field.clone()));
                }
            }
        }
    }
    for (name, from_field) in &from.fields {
        if !to.fields.contains_key(name) {
            diff.removed.push(from_field.clone());
        }
    }
    diff
}

/// Compare every model in `from`/`to` by name.
pub fn compare(from: &Schema, to: &Schema) -> TableDiff {
    let mut diff = TableDiff::default();

    for (name, to_model) in &to.models {
        match from.models.get(name) {
            None => diff.added.push(to_model.clone()),
            Some(from_model) => {
                let model_diff = ModelDiff {
                    model: name.clone(),
                    fields: diff_fields(from_model, to_model),
                    relations_changed: from_model.relations != to_model.relations,
                    rls_changed: from_model.row_level_security != to_model.row_level_security,
                    policies_changed: from_model.policies != to_model.policies,
                };
                if !model_diff.is_empty() {
                    diff.updated.push(model_diff);
                }
            }
        }
    }
    for (name, from_model) in &from.models {
        if !to.models.contains_key(name) {
            diff.removed.push(from_model.clone());
        }
    }

    diff
}

/// `CREATE TABLE` steps for new models (fields only; constraints are
/// emitted by the relation/index orchestrators).
pub fn plan_added(schema_name: &str, diff: &TableDiff, enum_names: &HashSet<String>) -> Vec<MigrationStep> {
    let mut added = diff.added.clone();
    sort_by_name(&mut added, |m| &m.name);
    added
        .iter()
        .map(|model| {
            MigrationStep::new(
                StepType::Create,
                ObjectKind::Table,
                model.name.clone(),
                render::create_table(schema_name, model, enum_names),
                render::drop_table(schema_name, &model.name),
            )
        })
        .collect()
}

/// `DROP TABLE` steps for removed models.
pub fn plan_removed(schema_name: &str, diff: &TableDiff, enum_names: &HashSet<String>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |m| &m.name);
    removed
        .iter()
        .map(|model| {
            MigrationStep::new(
                StepType::Drop,
                ObjectKind::Table,
                model.name.clone(),
                render::drop_table(schema_name, &model.name),
                render::create_table(schema_name, model, enum_names),
            )
        })
        .collect()
}

/// Column add/alter/remove steps for existing models (spec §4.2.3, tier 5:
/// added, updated, then removed within each model).
pub fn plan_columns(schema_name: &str, diff: &TableDiff, enum_names: &HashSet<String>) -> Vec<MigrationStep> {
    let mut updated = diff.updated.clone();
    sort_by_name(&mut updated, |d| &d.model);

    let mut steps = Vec::new();
    for model_diff in &updated {
        let model = &model_diff.model;

        let mut added = model_diff.fields.added.clone();
        sort_by_name(&mut added, |f| &f.name);
        for field in &added {
            steps.push(MigrationStep::new(
                StepType::Alter,
                ObjectKind::Column,
                format!("{model}_add_{}", field.name),
                render::add_column(schema_name, model, field, enum_names),
                render::drop_column(schema_name, model, &field.name),
            ));
        }

        let mut upd = model_diff.fields.updated.clone();
        sort_by_name(&mut upd, |(_, to)| &to.name);
        for (from_field, to_field) in &upd {
            steps.push(MigrationStep::new(
                StepType::Alter,
                ObjectKind::Column,
                format!("{model}_alter_{}", to_field.name),
                render::alter_column(schema_name, model, from_field, to_field, enum_names),
                render::alter_column(schema_name, model, to_field, from_field, enum_names),
            ));
        }

        let mut removed = model_diff.fields.removed.clone();
        sort_by_name(&mut removed, |f| &f.name);
        for field in &removed {
            steps.push(MigrationStep::new(
                StepType::Alter,
                ObjectKind::Column,
                format!("{model}_drop_{}", field.name),
                render::drop_column(schema_name, model, &field.name),
                render::add_column(schema_name, model, field, enum_names),
            ));
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_migrate_model::FieldType;

    fn user_model() -> Model {
        let mut m = Model::new("User");
        m.add_field(Field::new("id", FieldType::uuid()).id());
        m.add_field(Field::varchar("email", 255).unique());
        m
    }

    #[test]
    fn added_field_yields_single_add_column_step() {
        let from = user_model();
        let mut to = user_model();
        to.add_field(Field::varchar("name", 100).optional());

        let mut from_schema = Schema::new();
        from_schema.add_model(from);
        let mut to_schema = Schema::new();
        to_schema.add_model(to);

        let diff = compare(&from_schema, &to_schema);
        let steps = plan_columns("public", &diff, &HashSet::new());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "User_add_name");
        assert!(steps[0].sql.starts_with("ALTER TABLE \"public\".\"User\" ADD COLUMN \"name\" VARCHAR(100)"));
        assert!(steps[0].rollback_sql.starts_with("ALTER TABLE \"public\".\"User\" DROP COLUMN \"name\""));
    }

    #[test]
    fn identical_models_produce_no_diff() {
        let mut schema = Schema::new();
        schema.add_model(user_model());
        assert!(compare(&schema, &schema.clone()).updated.is_empty());
    }

    #[test]
    fn new_model_is_added_not_updated() {
        let mut to = Schema::new();
        to.add_model(user_model());
        let diff = compare(&Schema::new(), &to);
        assert_eq!(diff.added.len(), 1);
        assert!(diff.updated.is_empty());
    }

    #[test]
    fn attribute_only_change_yields_no_alter_column_step() {
        let mut from = user_model();
        from.fields.insert("email".to_string(), Field::varchar("email", 255));
        let to = user_model();

        let mut from_schema = Schema::new();
        from_schema.add_model(from);
        let mut to_schema = Schema::new();
        to_schema.add_model(to);

        let diff = compare(&from_schema, &to_schema);
        assert!(diff.updated.is_empty());
        let steps = plan_columns("public", &diff, &HashSet::new());
        assert!(steps.is_empty());
    }
}
