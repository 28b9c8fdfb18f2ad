//! The top-level `Schema` value: the desired database state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Enum, Extension, Model, Role, SchemaError, SchemaResult};

/// The desired database state (spec §3): an ordered list of models plus
/// name-unique sets of enums, extensions and roles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Models, in declaration order.
    pub models: IndexMap<String, Model>,
    /// Enum types, keyed by name.
    pub enums: IndexMap<String, Enum>,
    /// Extensions, keyed by name.
    pub extensions: IndexMap<String, Extension>,
    /// Roles, keyed by name.
    pub roles: IndexMap<String, Role>,
}

impl Schema {
    /// An empty schema — the canonical "from" baseline for a fresh install.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model, replacing any prior model of the same name.
    pub fn add_model(&mut self, model: Model) {
        self.models.insert(model.name.clone(), model);
    }

    /// Add an enum.
    pub fn add_enum(&mut self, e: Enum) {
        self.enums.insert(e.name.clone(), e);
    }

    /// Add an extension.
    pub fn add_extension(&mut self, extension: Extension) {
        self.extensions.insert(extension.name.clone(), extension);
    }

    /// Add a role.
    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role.name.clone(), role);
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Validate the schema's cross-referential invariants (spec §3):
    /// every relation's target model exists, every field referenced by an
    /// index or relation exists on its owning model, and at most one `id`
    /// field per model.
    pub fn validate(&self) -> SchemaResult<()> {
        for model in self.models.values() {
            let id_count = model.fields.values().filter(|f| f.is_id()).count();
            if id_count > 1 {
                return Err(SchemaError::MultiplePrimaryKeys(model.name.clone()));
            }

            for index in &model.indexes {
                for field in &index.fields {
                    if !model.fields.contains_key(field) {
                        return Err(SchemaError::FieldNotFound {
                            model: model.name.clone(),
                            field: field.clone(),
                        });
                    }
                }
            }

            for relation in &model.relations {
                if !self.models.contains_key(&relation.model) {
                    return Err(SchemaError::ModelNotFound(relation.model.clone()));
                }
                if relation.fields.len() != relation.references.len() {
                    return Err(SchemaError::RelationArityMismatch(relation.name.clone()));
                }
                for field in &relation.fields {
                    if !model.fields.contains_key(field) {
                        return Err(SchemaError::FieldNotFound {
                            model: model.name.clone(),
                            field: field.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
