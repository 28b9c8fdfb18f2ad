//! PostgreSQL enum type definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An enum type declaration.
///
/// Identity for diffing is the name; equality for diffing is
/// *set*-equality of `values` — reordering the declared values alone is
/// not a schema change (spec §3, §8 invariant 7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    /// Enum type name.
    pub name: String,
    /// Declared values, in declaration order (order is preserved on disk
    /// and in generated SQL, but not significant for diffing).
    pub values: Vec<String>,
}

impl Enum {
    /// Create a new enum.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Whether `self` and `other` have the same value set, ignoring order.
    pub fn same_values(&self, other: &Enum) -> bool {
        let a: HashSet<&String> = self.values.iter().collect();
        let b: HashSet<&String> = other.values.iter().collect();
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reordered_values_are_equal() {
        let a = Enum::new("UserRole", vec!["ADMIN".into(), "USER".into()]);
        let b = Enum::new("UserRole", vec!["USER".into(), "ADMIN".into()]);
        assert!(a.same_values(&b));
    }

    #[test]
    fn added_value_is_not_equal() {
        let a = Enum::new("UserRole", vec!["ADMIN".into(), "USER".into()]);
        let b = Enum::new("UserRole", vec!["ADMIN".into(), "USER".into(), "GUEST".into()]);
        assert!(!a.same_values(&b));
    }
}
