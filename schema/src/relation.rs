//! Relations between models (foreign keys and back-references).

use serde::{Deserialize, Serialize};

/// The cardinality of a [`Relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationType {
    /// Exactly one row on each side.
    OneToOne,
    /// One row on this side may be referenced by many rows on the other.
    OneToMany,
    /// Many rows on each side, via an implicit join.
    ManyToMany,
}

/// Referential action for `ON DELETE`/`ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// `CASCADE`.
    Cascade,
    /// `RESTRICT`.
    Restrict,
    /// `SET NULL`.
    SetNull,
    /// `SET DEFAULT`.
    SetDefault,
    /// `NO ACTION` (the PostgreSQL default).
    NoAction,
}

impl ReferentialAction {
    /// The SQL keyword for this action.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// A relation declared on a model.
///
/// When `fields`/`references` are both populated the relation owns a
/// foreign key and the orchestrator in `schema-migrate-core` emits
/// constraint DDL for it; when either is absent the relation is a pure
/// back-reference and produces no SQL of its own (see spec §3, §4.2.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation name, unique within the owning model.
    pub name: String,
    /// Cardinality of the relation.
    pub relation_type: RelationType,
    /// Name of the target model.
    pub model: String,
    /// Local columns that hold the foreign key, if this side owns it.
    pub fields: Vec<String>,
    /// Columns on the target model referenced by `fields`.
    pub references: Vec<String>,
    /// `ON DELETE` behavior, defaulting to `NoAction`.
    pub on_delete: ReferentialAction,
    /// `ON UPDATE` behavior, defaulting to `NoAction`.
    pub on_update: ReferentialAction,
}

impl Relation {
    /// Create a back-reference (no foreign key columns) relation.
    pub fn back_reference(
        name: impl Into<String>,
        relation_type: RelationType,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relation_type,
            model: model.into(),
            fields: Vec::new(),
            references: Vec::new(),
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        }
    }

    /// Create a relation that owns a foreign key.
    pub fn with_foreign_key(
        name: impl Into<String>,
        relation_type: RelationType,
        model: impl Into<String>,
        fields: Vec<String>,
        references: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            relation_type,
            model: model.into(),
            fields,
            references,
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
        }
    }

    /// Set the `ON DELETE` action.
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Set the `ON UPDATE` action.
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }

    /// True if this relation side owns a foreign-key constraint, i.e. both
    /// `fields` and `references` are populated (spec §4.2.4).
    pub fn owns_foreign_key(&self) -> bool {
        !self.fields.is_empty() && !self.references.is_empty()
    }

    /// Whether the comparable fields used in the orchestrator's "updated"
    /// check differ from `other`.
    pub fn differs_from(&self, other: &Relation) -> bool {
        self.relation_type != other.relation_type
            || self.model != other.model
            || self.fields != other.fields
            || self.references != other.references
            || self.on_delete != other.on_delete
            || self.on_update != other.on_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_reference_has_no_foreign_key() {
        let r = Relation::back_reference("orders", RelationType::OneToMany, "Order");
        assert!(!r.owns_foreign_key());
    }

    #[test]
    fn with_foreign_key_owns_it() {
        let r = Relation::with_foreign_key(
            "user",
            RelationType::ManyToMany,
            "User",
            vec!["userId".into()],
            vec!["id".into()],
        );
        assert!(r.owns_foreign_key());
    }
}
