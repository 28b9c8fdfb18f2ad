//! Relation (foreign key) orchestrator (spec §4.2.4).

use schema_migrate_model::{Relation, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// One model's relation, identified by `(owning_model, relation_name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedRelation {
    /// The model this relation is declared on.
    pub model: String,
    /// The relation itself.
    pub relation: Relation,
}

/// Compare every relation that owns a foreign key (`fields`/`references`
/// both populated) across every model present in both schemas, plus
/// relations on newly-added/removed models (back-references never yield
/// steps and so never surface from this orchestrator, spec §4.2.4).
pub fn compare(from: &Schema, to: &Schema) -> Diff<OwnedRelation> {
    let mut diff = Diff::default();

    for (model_name, to_model) in &to.models {
        let from_model = from.models.get(model_name);
        for relation in &to_model.relations {
            if !relation.owns_foreign_key() {
                continue;
            }
            let prior = from_model.and_then(|m| m.relations.iter().find(|r| r.name == relation.name));
            match prior {
                None => diff.added.push(OwnedRelation {
                    model: model_name.clone(),
                    relation: relation.clone(),
                }),
                Some(prior_rel) => {
                    if prior_rel.differs_from(relation) {
                        diff.updated.push((
                            OwnedRelation {
                                model: model_name.clone(),
                                relation: prior_rel.clone(),
                            },
                            OwnedRelation {
                                model: model_name.clone(),
                                relation: relation.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    for (model_name, from_model) in &from.models {
        let to_model = to.models.get(model_name);
        for relation in &from_model.relations {
            if !relation.owns_foreign_key() {
                continue;
            }
            let still_present = to_model.is_some_and(|m| m.relations.iter().any(|r| r.name == relation.name));
            if !still_present {
                diff.removed.push(OwnedRelation {
                    model: model_name.clone(),
                    relation: relation.clone(),
                });
            }
        }
    }

    diff
}

fn create_step(schema_name: &str, owned: &OwnedRelation) -> MigrationStep {
    let r = &owned.relation;
    MigrationStep::new(
        StepType::Create,
        ObjectKind::ForeignKey,
        format!("{}_{}_fkey", owned.model, r.name),
        rebuild_create_sql(schema_name, owned),
        render::drop_foreign_key(schema_name, &owned.model, &r.name),
    )
}

/// Added/updated halves: `ADD CONSTRAINT` steps, run after all referenced
/// tables exist (planner tier 6).
pub fn plan_added(schema_name: &str, diff: &Diff<OwnedRelation>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |o| &o.relation.name);
    for owned in &added {
        steps.push(create_step(schema_name, owned));
    }

    let mut updated = diff.updated.clone();
    updated.sort_by(|a, b| a.1.relation.name.cmp(&b.1.relation.name));
    for (from_owned, to_owned) in &updated {
        let name = format!("{}_{}_fkey", to_owned.model, to_owned.relation.name);
        steps.push(MigrationStep::new(
            StepType::Drop,
            ObjectKind::ForeignKey,
            format!("{name}_drop"),
            render::drop_foreign_key(schema_name, &from_owned.model, &from_owned.relation.name),
            rebuild_create_sql(schema_name, from_owned),
        ));
        steps.push(create_step(schema_name, to_owned));
    }

    steps
}

/// Removed half: `DROP CONSTRAINT` steps.
pub fn plan_removed(schema_name: &str, diff: &Diff<OwnedRelation>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |o| &o.relation.name);
    removed
        .iter()
        .map(|owned| {
            let r = &owned.relation;
            MigrationStep::new(
                StepType::Drop,
                ObjectKind::ForeignKey,
                format!("{}_{}_fkey", owned.model, r.name),
                render::drop_foreign_key(schema_name, &owned.model, &r.name),
                rebuild_create_sql(schema_name, owned),
            )
        })
        .collect()
}

fn rebuild_create_sql(schema_name: &str, owned: &OwnedRelation) -> String {
    let r = &owned.relation;
    render::create_foreign_key(
        schema_name,
        &owned.model,
        &r.name,
        &r.fields,
        &r.model,
        &r.references,
        r.on_delete.sql(),
        r.on_update.sql(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_migrate_model::{Model, RelationType};

    #[test]
    fn back_reference_yields_no_diff() {
        let mut to = Schema::new();
        let mut order = Model::new("Order");
        order.add_relation(Relation::back_reference("user", RelationType::OneToMany, "User"));
        to.add_model(order);
        assert!(compare(&Schema::new(), &to).is_empty());
    }

    #[test]
    fn owning_relation_is_added() {
        let mut to = Schema::new();
        let mut order = Model::new("Order");
        order.add_relation(Relation::with_foreign_key(
            "user",
            RelationType::OneToMany,
            "User",
            vec!["userId".into()],
            vec!["id".into()],
        ));
        to.add_model(order);
        let diff = compare(&Schema::new(), &to);
        assert_eq!(diff.added.len(), 1);
        let steps = plan_added("public", &diff);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "Order_user_fkey");
    }
}
