//! Errors raised while constructing or validating a [`crate::Schema`].

use thiserror::Error;

/// Result type alias for schema construction operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while building or validating a schema value.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A model referenced by a relation does not exist.
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    /// A field referenced by an index or relation does not exist on its model.
    #[error("field '{field}' not found on model '{model}'")]
    FieldNotFound {
        /// Owning model name.
        model: String,
        /// Missing field name.
        field: String,
    },

    /// More than one field on a model carries the `id` attribute.
    #[error("model '{0}' has more than one id field")]
    MultiplePrimaryKeys(String),

    /// A relation's `fields` and `references` lists have mismatched lengths.
    #[error("relation '{0}' has mismatched fields/references lengths")]
    RelationArityMismatch(String),

    /// A name that must be unique within its scope was declared twice.
    #[error("duplicate {kind} name '{name}'")]
    Duplicate {
        /// Kind of entity (e.g. "model", "enum", "extension").
        kind: &'static str,
        /// The duplicated name.
        name: String,
    },

    /// Catch-all for validation failures not covered by a dedicated variant.
    #[error("invalid schema: {0}")]
    Invalid(String),
}
