//! Role orchestrator (spec §4.2.8).
//!
//! Split into `plan_shape` (CREATE/DROP ROLE, planner tier 3) and
//! `plan_grants` (GRANT statements, planner tier 8) per spec §4.3's tiered
//! ordering, which defers all grants to after tables/indexes exist.

use schema_migrate_model::{Role, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// Compare role sets by name; "updated" iff the per-target privilege set
/// differs (order-insensitive, spec §4.2.8).
pub fn compare(from: &Schema, to: &Schema) -> Diff<Role> {
    let mut diff = Diff::default();
    for (name, to_role) in &to.roles {
        match from.roles.get(name) {
            None => diff.added.push(to_role.clone()),
            Some(from_role) => {
                if from_role.differs_from(to_role) {
                    diff.updated.push((from_role.clone(), to_role.clone()));
                }
            }
        }
    }
    for (name, from_role) in &from.roles {
        if !to.roles.contains_key(name) {
            diff.removed.push(from_role.clone());
        }
    }
    diff
}

fn grant_sql_for(role: &Role) -> Vec<String> {
    role.privileges
        .iter()
        .map(|g| g.privileges.iter().map(|p| p.sql()).collect::<Vec<_>>().join(", "))
        .collect()
}

fn full_recreate_sql(schema_name: &str, role: &Role) -> String {
    let mut parts = vec![render::create_role(&role.name)];
    for (grant, priv_sql) in role.privileges.iter().zip(grant_sql_for(role)) {
        parts.push(render::grant(schema_name, role, &grant.on, &priv_sql));
    }
    parts.join("\n")
}

/// Tier-3 steps: `CREATE ROLE` for additions, drop-then-recreate for
/// updates, a single `DROP ROLE` for removals.
pub fn plan_shape(schema_name: &str, diff: &Diff<Role>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |r| &r.name);
    for role in &added {
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Role,
            role.name.clone(),
            render::create_role(&role.name),
            render::drop_role(&role.name),
        ));
    }

    let mut updated = diff.updated.clone();
    sort_by_name(&mut updated, |(_, to)| &to.name);
    for (from_role, to_role) in &updated {
        steps.push(MigrationStep::new(
            StepType::Drop,
            ObjectKind::Role,
            format!("{}_old", to_role.name),
            render::drop_role(&from_role.name),
            full_recreate_sql(schema_name, from_role),
        ));
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Role,
            to_role.name.clone(),
            render::create_role(&to_role.name),
            render::drop_role(&to_role.name),
        ));
    }

    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |r| &r.name);
    for role in &removed {
        steps.push(MigrationStep::new(
            StepType::Drop,
            ObjectKind::Role,
            role.name.clone(),
            render::drop_role(&role.name),
            full_recreate_sql(schema_name, role),
        ));
    }

    steps
}

/// Tier-8 steps: one `GRANT` per target for every added/updated role's new
/// privilege set, named `<role>_grant_<i>` (spec §4.2.8).
pub fn plan_grants(schema_name: &str, diff: &Diff<Role>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |r| &r.name);
    for role in &added {
        emit_grants(schema_name, role, &mut steps);
    }

    let mut updated = diff.updated.clone();
    sort_by_name(&mut updated, |(_, to)| &to.name);
    for (_, to_role) in &updated {
        emit_grants(schema_name, to_role, &mut steps);
    }

    steps
}

fn emit_grants(schema_name: &str, role: &Role, steps: &mut Vec<MigrationStep>) {
    for (i, target) in role.privileges.iter().enumerate() {
        let priv_sql = target.privileges.iter().map(|p| p.sql()).collect::<Vec<_>>().join(", ");
        let grant_sql = render::grant(schema_name, role, &target.on, &priv_sql);
        let revoke_sql = render::revoke(schema_name, role, &target.on, &priv_sql);
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Role,
            format!("{}_grant_{i}", role.name),
            grant_sql,
            revoke_sql,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_migrate_model::Privilege;

    #[test]
    fn added_role_emits_create_and_grants() {
        let mut to = Schema::new();
        to.add_role(Role::new("app").grant(vec![Privilege::Select], "User"));
        let diff = compare(&Schema::new(), &to);
        let shape = plan_shape("public", &diff);
        assert_eq!(shape.len(), 1);
        let grants = plan_grants("public", &diff);
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].name, "app_grant_0");
    }

    #[test]
    fn grant_order_does_not_trigger_update() {
        let mut from = Schema::new();
        from.add_role(Role::new("app").grant(vec![Privilege::Select, Privilege::Insert], "User"));
        let mut to = Schema::new();
        to.add_role(Role::new("app").grant(vec![Privilege::Insert, Privilege::Select], "User"));
        assert!(compare(&from, &to).is_empty());
    }

    #[test]
    fn removed_role_rollback_recreates_grants() {
        let mut from = Schema::new();
        from.add_role(Role::new("app").grant(vec![Privilege::Select], "User"));
        let diff = compare(&from, &Schema::new());
        let steps = plan_shape("public", &diff);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].rollback_sql.contains("CREATE ROLE"));
        assert!(steps[0].rollback_sql.contains("GRANT"));
    }
}
