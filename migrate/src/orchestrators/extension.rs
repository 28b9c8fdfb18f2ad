//! Extension orchestrator (spec §4.2.1).

use schema_migrate_model::{Extension, Schema};

use super::{sort_by_name, Diff};
use crate::migration::{MigrationStep, ObjectKind, StepType};
use crate::render;

/// Compare extension sets by name; "updated" iff version differs, treating
/// a missing version as the empty string.
pub fn compare(from: &Schema, to: &Schema) -> Diff<Extension> {
    let mut diff = Diff::default();
    for (name, to_ext) in &to.extensions {
        match from.extensions.get(name) {
            None => diff.added.push(to_ext.clone()),
            Some(from_ext) => {
                if from_ext.version_or_empty() != to_ext.version_or_empty() {
                    diff.updated.push((from_ext.clone(), to_ext.clone()));
                }
            }
        }
    }
    for (name, from_ext) in &from.extensions {
        if !to.extensions.contains_key(name) {
            diff.removed.push(from_ext.clone());
        }
    }
    diff
}

/// `added`/`updated` half: `CREATE EXTENSION` steps, including the drop
/// half of an update (named `<name>_old`) immediately before its create.
pub fn plan_added(diff: &Diff<Extension>) -> Vec<MigrationStep> {
    let mut steps = Vec::new();

    let mut added = diff.added.clone();
    sort_by_name(&mut added, |e| &e.name);
    for ext in &added {
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Extension,
            ext.name.clone(),
            render::create_extension(&ext.name, ext.version.as_deref()),
            render::drop_extension(&ext.name),
        ));
    }

    let mut updated = diff.updated.clone();
    sort_by_name(&mut updated, |(_, to)| &to.name);
    for (from_ext, to_ext) in &updated {
        steps.push(MigrationStep::new(
            StepType::Drop,
            ObjectKind::Extension,
            format!("{}_old", to_ext.name),
            render::drop_extension(&from_ext.name),
            render::create_extension(&from_ext.name, from_ext.version.as_deref()),
        ));
        steps.push(MigrationStep::new(
            StepType::Create,
            ObjectKind::Extension,
            to_ext.name.clone(),
            render::create_extension(&to_ext.name, to_ext.version.as_deref()),
            render::drop_extension(&to_ext.name),
        ));
    }

    steps
}

/// `removed` half: `DROP EXTENSION` steps.
pub fn plan_removed(diff: &Diff<Extension>) -> Vec<MigrationStep> {
    let mut removed = diff.removed.clone();
    sort_by_name(&mut removed, |e| &e.name);
    removed
        .iter()
        .map(|ext| {
            MigrationStep::new(
                StepType::Drop,
                ObjectKind::Extension,
                ext.name.clone(),
                render::drop_extension(&ext.name),
                render::create_extension(&ext.name, ext.version.as_deref()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_extension_is_added() {
        let mut to = Schema::new();
        to.add_extension(Extension::new("pg_trgm"));
        let diff = compare(&Schema::new(), &to);
        assert_eq!(diff.added.len(), 1);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn missing_version_equals_empty_string() {
        let mut from = Schema::new();
        from.add_extension(Extension::new("pg_trgm"));
        let mut to = Schema::new();
        to.add_extension(Extension::new("pg_trgm").with_version(""));
        assert!(compare(&from, &to).is_empty());
    }

    #[test]
    fn version_change_is_updated() {
        let mut from = Schema::new();
        from.add_extension(Extension::new("pg_trgm").with_version("1.5"));
        let mut to = Schema::new();
        to.add_extension(Extension::new("pg_trgm").with_version("1.6"));
        let diff = compare(&from, &to);
        assert_eq!(diff.updated.len(), 1);
        let steps = plan_added(&diff);
        assert_eq!(steps.len(), 2);
        assert!(steps[0].name.ends_with("_old"));
    }

    #[test]
    fn removed_extension_round_trips() {
        let mut from = Schema::new();
        from.add_extension(Extension::new("pg_trgm"));
        let diff = compare(&from, &Schema::new());
        let steps = plan_removed(&diff);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].sql.starts_with("DROP EXTENSION"));
        assert!(steps[0].rollback_sql.starts_with("CREATE EXTENSION"));
    }
}
