//! Row-level-security flag orchestrator (spec §4.2.6).

use schema_migrate_model::{RowLevelSecurity, Schema};

use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// Per-model RLS-flag change: presence changed (added/removed) or just the
/// `force` bit flipped while `enabled` stayed on (updated).
#[derive(Debug, Clone)]
pub enum RlsChange {
    /// RLS newly configured on this model.
    Added(RowLevelSecurity),
    /// RLS configuration removed from this model.
    Removed(RowLevelSecurity),
    /// RLS configuration present on both sides but differs.
    Updated(RowLevelSecurity, RowLevelSecurity),
}

/// One model's RLS change.
#[derive(Debug, Clone)]
pub struct ModelRlsDiff {
    /// Model name.
    pub model: String,
    /// The change itself.
    pub change: RlsChange,
}

/// Compare RLS presence/settings for every model present in either schema.
pub fn compare(from: &Schema, to: &Schema) -> Vec<ModelRlsDiff> {
    let mut diffs = Vec::new();

    for (name, to_model) in &to.models {
        let from_rls = from.models.get(name).and_then(|m| m.row_level_security);
        match (from_rls, to_model.row_level_security) {
            (None, Some(to_rls)) => diffs.push(ModelRlsDiff {
                model: name.clone(),
                change: RlsChange::Added(to_rls),
            }),
            (Some(from_rls), Some(to_rls)) if from_rls != to_rls => diffs.push(ModelRlsDiff {
                model: name.clone(),
                change: RlsChange::Updated(from_rls, to_rls),
            }),
            _ => {}
        }
    }

    for (name, from_model) in &from.models {
        let Some(from_rls) = from_model.row_level_security else {
            continue;
        };
        let to_rls = to.models.get(name).and_then(|m| m.row_level_security);
        if to_rls.is_none() {
            diffs.push(ModelRlsDiff {
                model: name.clone(),
                change: RlsChange::Removed(from_rls),
            });
        }
    }

    diffs.sort_by(|a, b| a.model.cmp(&b.model));
    diffs
}

/// Steps for one model's RLS change (spec §4.2.6):
/// - Added: `rls_<Model>_0` (`ENABLE`), and if `force`, `rls_<Model>_1` (`FORCE`).
/// - Removed: `DISABLE`, and if the removed config was forced, `NO FORCE`.
/// - Updated: only the bits that changed, as `rls_<Model>_enable|disable|force|no_force`.
pub fn plan_one(schema_name: &str, diff: &ModelRlsDiff) -> Vec<MigrationStep> {
    let model = &diff.model;
    match &diff.change {
        RlsChange::Added(rls) => {
            let mut steps = vec![MigrationStep::new(
                StepType::Create,
                ObjectKind::Rls,
                format!("rls_{model}_0"),
                render::enable_rls(schema_name, model),
                render::disable_rls(schema_name, model),
            )];
            if rls.force {
                steps.push(MigrationStep::new(
                    StepType::Create,
                    ObjectKind::Rls,
                    format!("rls_{model}_1"),
                    render::force_rls(schema_name, model),
                    render::no_force_rls(schema_name, model),
                ));
            }
            steps
        }
        RlsChange::Removed(rls) => {
            let mut steps = vec![MigrationStep::new(
                StepType::Drop,
                ObjectKind::Rls,
                format!("rls_{model}_disable"),
                render::disable_rls(schema_name, model),
                render::enable_rls(schema_name, model),
            )];
            if rls.force {
                steps.push(MigrationStep::new(
                    StepType::Drop,
                    ObjectKind::Rls,
                    format!("rls_{model}_no_force"),
                    render::no_force_rls(schema_name, model),
                    render::force_rls(schema_name, model),
                ));
            }
            steps
        }
        RlsChange::Updated(from_rls, to_rls) => {
            let mut steps = Vec::new();
            if from_rls.enabled != to_rls.enabled {
                if to_rls.enabled {
                    steps.push(MigrationStep::new(
                        StepType::Alter,
                        ObjectKind::Rls,
                        format!("rls_{model}_enable"),
                        render::enable_rls(schema_name, model),
                        render::disable_rls(schema_name, model),
                    ));
                } else {
                    steps.push(MigrationStep::new(
                        StepType::Alter,
                        ObjectKind::Rls,
                        format!("rls_{model}_disable"),
                        render::disable_rls(schema_name, model),
                        render::enable_rls(schema_name, model),
                    ));
                }
            }
            if from_rls.force != to_rls.force {
                if to_rls.force {
                    steps.push(MigrationStep::new(
                        StepType::Alter,
                        ObjectKind::Rls,
                        format!("rls_{model}_force"),
                        render::force_rls(schema_name, model),
                        render::no_force_rls(schema_name, model),
                    ));
                } else {
                    steps.push(MigrationStep::new(
                        StepType::Alter,
                        ObjectKind::Rls,
                        format!("rls_{model}_no_force"),
                        render::no_force_rls(schema_name, model),
                        render::force_rls(schema_name, model),
                    ));
                }
            }
            steps
        }
    }
}

/// Plan all RLS steps across every model diff (planner tier 9).
pub fn plan(schema_name: &str, diffs: &[ModelRlsDiff]) -> Vec<MigrationStep> {
    diffs.iter().flat_map(|d| plan_one(schema_name, d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_migrate_model::Model;

    #[test]
    fn added_forced_rls_emits_two_steps() {
        let mut to = Schema::new();
        to.add_model(Model::new("User").with_rls(RowLevelSecurity::enabled_forced()));
        let diffs = compare(&Schema::new(), &to);
        let steps = plan("public", &diffs);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].name, "rls_User_0");
        assert_eq!(steps[1].name, "rls_User_1");
    }

    #[test]
    fn added_unforced_rls_emits_one_step() {
        let mut to = Schema::new();
        to.add_model(Model::new("User").with_rls(RowLevelSecurity::enabled()));
        let diffs = compare(&Schema::new(), &to);
        let steps = plan("public", &diffs);
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn force_only_change_emits_one_alter_step() {
        let mut from = Schema::new();
        from.add_model(Model::new("User").with_rls(RowLevelSecurity::enabled()));
        let mut to = Schema::new();
        to.add_model(Model::new("User").with_rls(RowLevelSecurity::enabled_forced()));
        let diffs = compare(&from, &to);
        let steps = plan("public", &diffs);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "rls_User_force");
    }
}
