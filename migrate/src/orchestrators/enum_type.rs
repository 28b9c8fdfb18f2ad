//! Enum orchestrator (spec §4.2.2).

use schema_migrate_model::{Enum, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// Compare enum sets by name; equality is *set*-equality of values, so
/// reordering alone is not a change (spec §8 invariant 7).
pub fn compare(from: &Schema, to: &Schema) -> Diff<Enum> {
    let mut diff = Diff::default();
    for (name, to_enum) in &to.enums {
        match from.enums.get(name) {
            None => diff.added.push(to_enum.clone()),
            Some(from_enum) => {
                if !from_enum.same_values(to_enum) {
                    diff.updated.push((from_enum.clone(), to_enum.clone()));
                }
            }
        }
    }
    for (name, from_enum) in &from.enums {
        if !to.enums.contains_key(name) {
            diff.removed.push(from_enum.clone());
        }
    }
    diff
}

/// `added`/`updated` half: `CREATE TYPE ... AS ENUM`. An updated enum's
/// drop-half carries the *previous* definition as its rollback, so
/// reversing it restores the old values (spec §4.2.2).
pub fn plan_added(schema_name: &str, diff: &Diff<Enum>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |e| &e.name);
    for e in &added {
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Enum,
            e.name.clone(),
            render::create_enum(schema_name, &e.name, &e.values),
            render::drop_enum(schema_name, &e.name),
        ));
    }

    let mut updated = diff.updated.clone();
    sort_by_name(&mut updated, |(_, to)| &to.name);
    for (from_enum, to_enum) in &updated {
        steps.push(MigrationStep::new(
            StepType::Drop,
            ObjectKind::Enum,
            format!("{}_old", to_enum.name),
            render::drop_enum(schema_name, &from_enum.name),
            render::create_enum(schema_name, &from_enum.name, &from_enum.values),
        ));
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Enum,
            to_enum.name.clone(),
            render::create_enum(schema_name, &to_enum.name, &to_enum.values),
            render::drop_enum(schema_name, &to_enum.name),
        ));
    }

    steps
}

/// `removed` half: `DROP TYPE`.
pub fn plan_removed(schema_name: &str, diff: &Diff<Enum>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |e| &e.name);
    removed
        .iter()
        .map(|e| {
            MigrationStep::new(
                StepType::Drop,
                ObjectKind::Enum,
                e.name.clone(),
                render::drop_enum(schema_name, &e.name),
                render::create_enum(schema_name, &e.name, &e.values),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reordered_values_are_not_a_change() {
        let mut from = Schema::new();
        from.add_enum(Enum::new("UserRole", vec!["ADMIN".into(), "USER".into()]));
        let mut to = Schema::new();
        to.add_enum(Enum::new("UserRole", vec!["USER".into(), "ADMIN".into()]));
        assert!(compare(&from, &to).is_empty());
    }

    #[test]
    fn removed_value_is_updated() {
        let mut from = Schema::new();
        from.add_enum(Enum::new(
            "OrderStatus",
            vec!["PENDING".into(), "SHIPPED".into(), "CANCELLED".into()],
        ));
        let mut to = Schema::new();
        to.add_enum(Enum::new("OrderStatus", vec!["PENDING".into(), "SHIPPED".into()]));
        let diff = compare(&from, &to);
        assert_eq!(diff.updated.len(), 1);
        let steps = plan_added("public", &diff);
        assert_eq!(steps.len(), 2);
        assert!(steps[0].rollback_sql.contains("CANCELLED"));
    }
}
