//! Field definitions: a Field's type, attributes, and the Model-level
//! shape used throughout diffing and rendering.

use serde::{Deserialize, Serialize};

/// Built-in primitive column types.
///
/// Grounded on the scalar type set a schema language would expose to
/// users, restricted to what PostgreSQL's `CREATE TABLE`/`ALTER TABLE`
/// can render directly (no cross-dialect or extension-only types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// `INTEGER`.
    Int,
    /// `BIGINT`.
    BigInt,
    /// `DOUBLE PRECISION`.
    Float,
    /// `NUMERIC(precision, scale)`.
    Decimal,
    /// `VARCHAR(length)` when a length is set, otherwise `TEXT`.
    Varchar,
    /// `BOOLEAN`.
    Boolean,
    /// `TIMESTAMPTZ`.
    Timestamp,
    /// `DATE`.
    Date,
    /// `TIME`.
    Time,
    /// `JSONB`.
    Json,
    /// `BYTEA`.
    Bytes,
    /// `UUID`.
    Uuid,
}

impl PrimitiveType {
    /// The bare PostgreSQL type name, ignoring any length/precision/scale.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Self::Int => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Float => "DOUBLE PRECISION",
            Self::Decimal => "NUMERIC",
            Self::Varchar => "VARCHAR",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMPTZ",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Json => "JSONB",
            Self::Bytes => "BYTEA",
            Self::Uuid => "UUID",
        }
    }
}

/// A field's type: a built-in primitive, a reference to a declared enum,
/// or an array of either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// A built-in primitive type.
    Primitive(PrimitiveType),
    /// The name of an `Enum` declared elsewhere in the schema.
    Enum(String),
    /// An array of the given element type (`T[]`).
    Array(Box<FieldType>),
}

impl FieldType {
    /// Shorthand for `FieldType::Primitive(PrimitiveType::Uuid)`.
    pub fn uuid() -> Self {
        Self::Primitive(PrimitiveType::Uuid)
    }

    /// Shorthand for `FieldType::Primitive(PrimitiveType::Varchar)`. The
    /// column's length lives on [`Field::length`], not on the type itself —
    /// use [`Field::varchar`] to set both at once.
    pub fn varchar() -> Self {
        Self::Primitive(PrimitiveType::Varchar)
    }

    /// Shorthand for a reference to a declared enum.
    pub fn enum_ref(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// True if this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The enum name this type references, if any (looking through arrays).
    pub fn enum_name(&self) -> Option<&str> {
        match self {
            Self::Enum(name) => Some(name),
            Self::Array(inner) => inner.enum_name(),
            Self::Primitive(_) => None,
        }
    }
}

/// Per-field boolean/flag attributes. Spec's `attributes ⊆ {id, unique, default}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldAttribute {
    /// Marks this field as (part of) the primary key.
    Id,
    /// Marks this field as having a unique constraint.
    Unique,
    /// Marks this field as carrying a default value (see [`Field::default_value`]).
    Default,
}

/// A single column on a [`crate::Model`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, unique within its owning model.
    pub name: String,
    /// The field's type.
    pub field_type: FieldType,
    /// Attribute flags set on this field.
    pub attributes: Vec<FieldAttribute>,
    /// Literal or expression default value, rendered verbatim into SQL.
    pub default_value: Option<String>,
    /// `VARCHAR(length)` style length, when applicable.
    pub length: Option<u32>,
    /// `NUMERIC(precision, scale)` precision.
    pub precision: Option<u32>,
    /// `NUMERIC(precision, scale)` scale.
    pub scale: Option<u32>,
    /// Whether the column allows `NULL`. Defaults to `false` (required)
    /// unless explicitly marked nullable.
    pub nullable: bool,
}

impl Field {
    /// Create a new required, unattributed field of the given type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            attributes: Vec::new(),
            default_value: None,
            length: None,
            precision: None,
            scale: None,
            nullable: false,
        }
    }

    /// Create a required `VARCHAR(length)` field in one call.
    pub fn varchar(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, FieldType::varchar()).with_length(length)
    }

    /// Mark this field as the primary key.
    pub fn id(mut self) -> Self {
        if !self.attributes.contains(&FieldAttribute::Id) {
            self.attributes.push(FieldAttribute::Id);
        }
        self
    }

    /// Mark this field as unique.
    pub fn unique(mut self) -> Self {
        if !self.attributes.contains(&FieldAttribute::Unique) {
            self.attributes.push(FieldAttribute::Unique);
        }
        self
    }

    /// Mark this field as nullable.
    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set a default value, rendered verbatim into SQL (`DEFAULT <value>`).
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        if !self.attributes.contains(&FieldAttribute::Default) {
            self.attributes.push(FieldAttribute::Default);
        }
        self
    }

    /// Set `VARCHAR`-style length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set `NUMERIC`-style precision and scale.
    pub fn with_precision_scale(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// True if this field carries the `id` attribute.
    pub fn is_id(&self) -> bool {
        self.attributes.contains(&FieldAttribute::Id)
    }

    /// True if this field carries the `unique` attribute.
    pub fn is_unique(&self) -> bool {
        self.attributes.contains(&FieldAttribute::Unique)
    }

    /// Fields relevant to the "is this field updated" comparison in the
    /// table orchestrator: type, attribute set, default, length, precision,
    /// scale, nullable.
    pub fn differs_from(&self, other: &Field) -> bool {
        self.field_type != other.field_type
            || attribute_set_differs(&self.attributes, &other.attributes)
            || self.default_value != other.default_value
            || self.length != other.length
            || self.precision != other.precision
            || self.scale != other.scale
            || self.nullable != other.nullable
    }

    /// Facets an `ALTER TABLE ... ALTER COLUMN` statement can actually
    /// express: type, default, length, precision, scale, nullable.
    /// Attribute-only changes (`@unique`/`@id`) are deliberately excluded —
    /// the index orchestrator synthesizes unique indexes straight from the
    /// `unique` attribute, and a primary key is rendered at table-creation
    /// time, so neither needs (or has) an `ALTER COLUMN` rendering.
    pub fn plain_differs_from(&self, other: &Field) -> bool {
        self.field_type != other.field_type
            || self.default_value != other.default_value
            || self.length != other.length
            || self.precision != other.precision
            || self.scale != other.scale
            || self.nullable != other.nullable
    }
}

fn attribute_set_differs(a: &[FieldAttribute], b: &[FieldAttribute]) -> bool {
    use std::collections::HashSet;
    let a: HashSet<_> = a.iter().collect();
    let b: HashSet<_> = b.iter().collect();
    a != b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differs_from_ignores_attribute_order() {
        let a = Field::varchar("email", 255).unique().id();
        let b = Field::varchar("email", 255).id().unique();
        assert!(!a.differs_from(&b));
    }

    #[test]
    fn differs_from_detects_type_change() {
        let a = Field::new("age", FieldType::Primitive(PrimitiveType::Int));
        let b = Field::new("age", FieldType::Primitive(PrimitiveType::BigInt));
        assert!(a.differs_from(&b));
    }

    #[test]
    fn differs_from_detects_nullable_change() {
        let a = Field::varchar("name", 100);
        let b = Field::varchar("name", 100).optional();
        assert!(a.differs_from(&b));
    }

    #[test]
    fn plain_differs_from_ignores_attribute_only_change() {
        let a = Field::varchar("email", 255);
        let b = Field::varchar("email", 255).unique();
        assert!(a.differs_from(&b));
        assert!(!a.plain_differs_from(&b));
    }

    #[test]
    fn plain_differs_from_detects_type_change() {
        let a = Field::new("age", FieldType::Primitive(PrimitiveType::Int));
        let b = Field::new("age", FieldType::Primitive(PrimitiveType::BigInt));
        assert!(a.plain_differs_from(&b));
    }

    #[test]
    fn array_enum_name_looks_through_array() {
        let t = FieldType::Array(Box::new(FieldType::enum_ref("Role")));
        assert_eq!(t.enum_name(), Some("Role"));
    }
}
