//! Policy orchestrator (spec §4.2.7).

use schema_migrate_model::{Policy, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// One model's policy, carrying its owning model name for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedPolicy {
    /// The model this policy is declared on.
    pub model: String,
    /// The policy itself.
    pub policy: Policy,
}

/// Compare policies across every model, identified by `(model, name)`.
pub fn compare(from: &Schema, to: &Schema) -> Diff<OwnedPolicy> {
    let mut diff = Diff::default();

    for (model_name, to_model) in &to.models {
        let from_model = from.models.get(model_name);
        for policy in &to_model.policies {
            let prior = from_model.and_then(|m| m.policies.iter().find(|p| p.name == policy.name));
            match prior {
                None => diff.added.push(OwnedPolicy {
                    model: model_name.clone(),
                    policy: policy.clone(),
                }),
                Some(prior_policy) => {
                    if prior_policy.differs_from(policy) {
                        diff.updated.push((
                            OwnedPolicy {
                                model: model_name.clone(),
                                policy: prior_policy.clone(),
                            },
                            OwnedPolicy {
                                model: model_name.clone(),
                                policy: policy.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    for (model_name, from_model) in &from.models {
        let to_model = to.models.get(model_name);
        for policy in &from_model.policies {
            let still_present = to_model.is_some_and(|m| m.policies.iter().any(|p| p.name == policy.name));
            if !still_present {
                diff.removed.push(OwnedPolicy {
                    model: model_name.clone(),
                    policy: policy.clone(),
                });
            }
        }
    }

    diff
}

fn create_step(schema_name: &str, owned: &OwnedPolicy, name_suffix: Option<&str>) -> MigrationStep {
    let base_name = render::policy_name(&owned.model, &owned.policy.name);
    let name = match name_suffix {
        Some(suffix) => format!("{base_name}_{suffix}"),
        None => base_name,
    };
    MigrationStep::new(
        StepType::Create,
        ObjectKind::Policy,
        name,
        render::create_policy(schema_name, &owned.model, &owned.policy),
        render::drop_policy(schema_name, &owned.model, &owned.policy.name),
    )
}

fn drop_step(schema_name: &str, owned: &OwnedPolicy, name_suffix: Option<&str>) -> MigrationStep {
    let base_name = render::policy_name(&owned.model, &owned.policy.name);
    let name = match name_suffix {
        Some(suffix) => format!("{base_name}_{suffix}"),
        None => base_name,
    };
    MigrationStep::new(
        StepType::Drop,
        ObjectKind::Policy,
        name,
        render::drop_policy(schema_name, &owned.model, &owned.policy.name),
        render::create_policy(schema_name, &owned.model, &owned.policy),
    )
}

/// Added/updated halves (planner tier 10). Policies are never alterable in
/// place (spec §4.2.7): a create emits one step named `policy_<M>_<N>`; an
/// update emits a drop (`policy_<M>_<N>_drop`) then a create
/// (`policy_<M>_<N>_create`).
pub fn plan_added(schema_name: &str, diff: &Diff<OwnedPolicy>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |o| &o.model);
    for owned in &added {
        steps.push(create_step(schema_name, owned, None));
    }

    let mut updated = diff.updated.clone();
    updated.sort_by(|a, b| a.1.model.cmp(&b.1.model));
    for (from_owned, to_owned) in &updated {
        steps.push(drop_step(schema_name, from_owned, Some("drop")));
        steps.push(create_step(schema_name, to_owned, Some("create")));
    }

    steps
}

/// Removed half.
pub fn plan_removed(schema_name: &str, diff: &Diff<OwnedPolicy>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |o| &o.model);
    removed.iter().map(|owned| drop_step(schema_name, owned, None)).collect()
}
