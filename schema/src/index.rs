//! Index definitions.

use serde::{Deserialize, Serialize};

/// An index on a model.
///
/// Identity for diffing (spec §3, §8 invariant 8): the explicit `name` if
/// present, otherwise the *sorted* field list — so reordering an unnamed
/// index's columns alone is not treated as a schema change, while it is an
/// update if the index is explicitly named or `unique`/`where`/`type` differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Indexed columns, in declared order.
    pub fields: Vec<String>,
    /// Explicit index name, if the user supplied one.
    pub name: Option<String>,
    /// Whether this is a unique index.
    pub unique: bool,
    /// Optional partial-index predicate (`WHERE` clause body).
    pub where_clause: Option<String>,
    /// Optional access method (e.g. `gin`, `gist`, `hash`).
    pub index_type: Option<String>,
}

impl Index {
    /// Create a new non-unique, default-method index over `fields`.
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            name: None,
            unique: false,
            where_clause: None,
            index_type: None,
        }
    }

    /// Attach an explicit name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark this index as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Attach a partial-index predicate.
    pub fn with_where(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    /// Set the access method.
    pub fn with_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = Some(index_type.into());
        self
    }

    /// The diff identity key: explicit name, or the sorted field list.
    pub fn identity_key(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let mut fields = self.fields.clone();
                fields.sort();
                fields.join(",")
            }
        }
    }

    /// Whether this index's comparable attributes differ from `other`,
    /// given that both were already matched by [`Index::identity_key`].
    /// `unique`/`where`/`type` always count. The *ordered* field list only
    /// counts when both indexes are explicitly named — two unnamed indexes
    /// are matched by their *sorted* field list in the first place, so
    /// reordering alone is not a change for them (spec §8 invariant 8).
    pub fn differs_from(&self, other: &Index) -> bool {
        if self.unique != other.unique || self.where_clause != other.where_clause || self.index_type != other.index_type {
            return true;
        }
        if self.name.is_some() && other.name.is_some() {
            self.fields != other.fields
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_index_identity_is_sorted_fields() {
        let a = Index::new(vec!["b".into(), "a".into()]);
        let b = Index::new(vec!["a".into(), "b".into()]);
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn named_index_identity_is_name() {
        let a = Index::new(vec!["a".into()]).named("idx_custom");
        assert_eq!(a.identity_key(), "idx_custom");
    }

    #[test]
    fn unnamed_reordered_fields_do_not_differ() {
        let a = Index::new(vec!["a".into(), "b".into()]);
        let b = Index::new(vec!["b".into(), "a".into()]);
        assert!(!a.differs_from(&b));
    }

    #[test]
    fn named_reordered_fields_do_differ() {
        let a = Index::new(vec!["a".into(), "b".into()]).named("idx_custom");
        let b = Index::new(vec!["b".into(), "a".into()]).named("idx_custom");
        assert!(a.differs_from(&b));
    }
}
