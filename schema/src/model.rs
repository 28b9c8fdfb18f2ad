//! Model (table) definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Field, Index, Policy, Relation, RowLevelSecurity, Trigger};

/// A model — maps to a database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Model name, unique within the schema.
    pub name: String,
    /// Fields, in declaration order.
    pub fields: IndexMap<String, Field>,
    /// Relations declared on this model.
    pub relations: Vec<Relation>,
    /// Indexes declared on this model.
    pub indexes: Vec<Index>,
    /// Row-level-security flags, if configured.
    pub row_level_security: Option<RowLevelSecurity>,
    /// Policies declared on this model.
    pub policies: Vec<Policy>,
    /// Triggers declared on this model.
    pub triggers: Vec<Trigger>,
}

impl Model {
    /// Create a new, empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            relations: Vec::new(),
            indexes: Vec::new(),
            row_level_security: None,
            policies: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Add a field, in declaration order.
    pub fn add_field(&mut self, field: Field) {
        self.fields.insert(field.name.clone(), field);
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Add a relation.
    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Add an index.
    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    /// Set row-level-security flags.
    pub fn with_rls(mut self, rls: RowLevelSecurity) -> Self {
        self.row_level_security = Some(rls);
        self
    }

    /// Add a policy.
    pub fn add_policy(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// Add a trigger.
    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// The model's single `id` field, if any (spec §3 invariant: at most one).
    pub fn id_field(&self) -> Option<&Field> {
        self.fields.values().find(|f| f.is_id())
    }
}
