//! Index orchestrator (spec §4.2.5).

use std::collections::HashSet;

use schema_migrate_model::{Index, Model, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// A model's declared indexes plus one synthesized unique index per
/// `@unique` field (spec §8 S1: `@unique` must yield a unique index, not
/// just a constraint marker). Skips synthesis where an explicit index
/// already carries the same identity, so a user-declared index on a
/// `@unique` field isn't duplicated.
fn effective_indexes(model: &Model) -> Vec<Index> {
    let mut indexes = model.indexes.clone();
    let explicit_keys: HashSet<String> = indexes.iter().map(|i| i.identity_key()).collect();
    for field in model.fields.values() {
        if !field.is_unique() {
            continue;
        }
        let implicit = Index::new(vec![field.name.clone()]).unique();
        if !explicit_keys.contains(&implicit.identity_key()) {
            indexes.push(implicit);
        }
    }
    indexes
}

/// One model's index, carrying its owning model name for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedIndex {
    /// The model this index is declared on.
    pub model: String,
    /// The index itself.
    pub index: Index,
}

/// Compare indexes across every model, identified per spec §3/§8 invariant
/// 8 by explicit `name` if present, else the sorted field list.
pub fn compare(from: &Schema, to: &Schema) -> Diff<OwnedIndex> {
    let mut diff = Diff::default();

    for (model_name, to_model) in &to.models {
        let from_model = from.models.get(model_name);
        let from_indexes = from_model.map(effective_indexes).unwrap_or_default();
        for index in effective_indexes(to_model) {
            let key = index.identity_key();
            let prior = from_indexes.iter().find(|i| i.identity_key() == key);
            match prior {
                None => diff.added.push(OwnedIndex {
                    model: model_name.clone(),
                    index: index.clone(),
                }),
                Some(prior_idx) => {
                    if prior_idx.differs_from(&index) {
                        diff.updated.push((
                            OwnedIndex {
                                model: model_name.clone(),
                                index: prior_idx.clone(),
                            },
                            OwnedIndex {
                                model: model_name.clone(),
                                index: index.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    for (model_name, from_model) in &from.models {
        let to_model = to.models.get(model_name);
        let to_indexes = to_model.map(effective_indexes).unwrap_or_default();
        for index in effective_indexes(from_model) {
            let key = index.identity_key();
            let still_present = to_indexes.iter().any(|i| i.identity_key() == key);
            if !still_present {
                diff.removed.push(OwnedIndex {
                    model: model_name.clone(),
                    index: index.clone(),
                });
            }
        }
    }

    diff
}

fn create_step(schema_name: &str, owned: &OwnedIndex) -> MigrationStep {
    MigrationStep::new(
        StepType::Create,
        ObjectKind::Index,
        render::index_name(&owned.model, &owned.index),
        render::create_index(schema_name, &owned.model, &owned.index),
        render::drop_index(schema_name, &owned.model, &owned.index),
    )
}

fn drop_step(schema_name: &str, owned: &OwnedIndex) -> MigrationStep {
    MigrationStep::new(
        StepType::Drop,
        ObjectKind::Index,
        render::index_name(&owned.model, &owned.index),
        render::drop_index(schema_name, &owned.model, &owned.index),
        render::create_index(schema_name, &owned.model, &owned.index),
    )
}

/// Added/updated halves (planner tier 7).
pub fn plan_added(schema_name: &str, diff: &Diff<OwnedIndex>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |o| &o.model);
    for owned in &added {
        steps.push(create_step(schema_name, owned));
    }

    let mut updated = diff.updated.clone();
    updated.sort_by(|a, b| a.1.model.cmp(&b.1.model));
    for (from_owned, to_owned) in &updated {
        steps.push(drop_step(schema_name, from_owned));
        steps.push(create_step(schema_name, to_owned));
    }

    steps
}

/// Removed half.
pub fn plan_removed(schema_name: &str, diff: &Diff<OwnedIndex>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |o| &o.model);
    removed.iter().map(|owned| drop_step(schema_name, owned)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reordered_unnamed_index_fields_are_not_updated() {
        let mut from = Schema::new();
        let mut m1 = Model::new("User");
        m1.add_index(Index::new(vec!["a".into(), "b".into()]));
        from.add_model(m1);

        let mut to = Schema::new();
        let mut m2 = Model::new("User");
        m2.add_index(Index::new(vec!["b".into(), "a".into()]));
        to.add_model(m2);

        assert!(compare(&from, &to).is_empty());
    }

    #[test]
    fn unique_flag_change_is_updated() {
        let mut from = Schema::new();
        let mut m1 = Model::new("User");
        m1.add_index(Index::new(vec!["email".into()]));
        from.add_model(m1);

        let mut to = Schema::new();
        let mut m2 = Model::new("User");
        m2.add_index(Index::new(vec!["email".into()]).unique());
        to.add_model(m2);

        let diff = compare(&from, &to);
        assert_eq!(diff.updated.len(), 1);
    }

    #[test]
    fn new_index_yields_create_step_named_by_convention() {
        let mut to = Schema::new();
        let mut m = Model::new("User");
        m.add_index(Index::new(vec!["email".into()]).unique());
        to.add_model(m);
        let diff = compare(&Schema::new(), &to);
        let steps = plan_added("public", &diff);
        assert_eq!(steps[0].name, "idx_User_email_unique");
    }

    #[test]
    fn unique_field_synthesizes_unique_index() {
        use schema_migrate_model::{Field, FieldType};

        let mut to = Schema::new();
        let mut m = Model::new("User");
        m.add_field(Field::new("id", FieldType::uuid()).id());
        m.add_field(Field::varchar("email", 255).unique());
        to.add_model(m);

        let diff = compare(&Schema::new(), &to);
        assert_eq!(diff.added.len(), 1);
        let steps = plan_added("public", &diff);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "idx_User_email_unique");
        assert!(steps[0].sql.contains("CREATE UNIQUE INDEX"));
    }

    #[test]
    fn explicit_index_on_unique_field_is_not_duplicated() {
        use schema_migrate_model::{Field, FieldType};

        let mut to = Schema::new();
        let mut m = Model::new("User");
        m.add_field(Field::varchar("email", 255).unique());
        m.add_index(Index::new(vec!["email".into()]).unique());
        to.add_model(m);

        let diff = compare(&Schema::new(), &to);
        assert_eq!(diff.added.len(), 1);
    }

    #[test]
    fn unique_attribute_removed_drops_synthesized_index() {
        use schema_migrate_model::Field;

        let mut from = Schema::new();
        let mut m1 = Model::new("User");
        m1.add_field(Field::varchar("email", 255).unique());
        from.add_model(m1);

        let mut to = Schema::new();
        let mut m2 = Model::new("User");
        m2.add_field(Field::varchar("email", 255));
        to.add_model(m2);

        let diff = compare(&from, &to);
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].index.fields, vec!["email".to_string()]);
    }
}
