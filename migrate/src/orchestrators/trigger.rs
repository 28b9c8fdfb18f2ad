//! Trigger orchestrator (spec §4.2.9).

use schema_migrate_model::{Schema, Trigger};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// One model's trigger, carrying its owning model name for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedTrigger {
    /// The model this trigger is declared on.
    pub model: String,
    /// The trigger itself.
    pub trigger: Trigger,
}

/// Compare triggers across every model by identity `(model, event, level,
/// canonical(execute))`. A body change is therefore a different identity —
/// the diff naturally produces a remove+add pair rather than an "updated"
/// entry, matching spec §4.2.9.
pub fn compare(from: &Schema, to: &Schema) -> Diff<OwnedTrigger> {
    let mut diff = Diff::default();

    for (model_name, to_model) in &to.models {
        let from_model = from.models.get(model_name);
        for trigger in &to_model.triggers {
            let key = trigger.identity_key();
            let present = from_model.is_some_and(|m| m.triggers.iter().any(|t| t.identity_key() == key));
            if !present {
                diff.added.push(OwnedTrigger {
                    model: model_name.clone(),
                    trigger: trigger.clone(),
                });
            }
        }
    }

    for (model_name, from_model) in &from.models {
        let to_model = to.models.get(model_name);
        for trigger in &from_model.triggers {
            let key = trigger.identity_key();
            let still_present = to_model.is_some_and(|m| m.triggers.iter().any(|t| t.identity_key() == key));
            if !still_present {
                diff.removed.push(OwnedTrigger {
                    model: model_name.clone(),
                    trigger: trigger.clone(),
                });
            }
        }
    }

    diff
}

/// Added half: each step creates both the backing `plpgsql` function and
/// the trigger binding in one SQL block (planner tier 11).
pub fn plan_added(schema_name: &str, diff: &Diff<OwnedTrigger>) -> Vec<MigrationStep> {
    let mut added = diff.added.clone();
    sort_by_name(&mut added, |o| &o.model);
    added
        .iter()
        .map(|owned| {
            MigrationStep::new(
                StepType::Create,
                ObjectKind::Trigger,
                render::trigger_name(&owned.model, &owned.trigger),
                render::create_trigger(schema_name, &owned.model, &owned.trigger),
                render::drop_trigger(schema_name, &owned.model, &owned.trigger),
            )
        })
        .collect()
}

/// Removed half.
pub fn plan_removed(schema_name: &str, diff: &Diff<OwnedTrigger>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |o| &o.model);
    removed
        .iter()
        .map(|owned| {
            MigrationStep::new(
                StepType::Drop,
                ObjectKind::Trigger,
                render::trigger_name(&owned.model, &owned.trigger),
                render::drop_trigger(schema_name, &owned.model, &owned.trigger),
                render::create_trigger(schema_name, &owned.model, &owned.trigger),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema_migrate_model::{Model, TriggerLevel};

    #[test]
    fn body_change_is_remove_plus_add() {
        let mut from = Schema::new();
        let mut m1 = Model::new("User");
        m1.triggers.push(Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN NEW.x := 1; END;"));
        from.add_model(m1);

        let mut to = Schema::new();
        let mut m2 = Model::new("User");
        m2.triggers.push(Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN NEW.x := 2; END;"));
        to.add_model(m2);

        let diff = compare(&from, &to);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.removed.len(), 1);
        assert!(diff.updated.is_empty());
    }

    #[test]
    fn whitespace_only_change_is_not_a_diff() {
        let mut from = Schema::new();
        let mut m1 = Model::new("User");
        m1.triggers.push(Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN NEW.x := 1; END;"));
        from.add_model(m1);

        let mut to = Schema::new();
        let mut m2 = Model::new("User");
        m2.triggers.push(Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "  BEGIN  NEW.x := 1; END;  "));
        to.add_model(m2);

        assert!(compare(&from, &to).is_empty());
    }
}
