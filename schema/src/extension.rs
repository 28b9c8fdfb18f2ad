//! PostgreSQL extension declarations.

use serde::{Deserialize, Serialize};

/// A `CREATE EXTENSION` declaration.
///
/// Identity is the name; an extension is "updated" iff its version
/// differs, treating a missing version as the empty string (spec §4.2.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    /// Extension name (e.g. `"pg_trgm"`).
    pub name: String,
    /// Pinned version, if any.
    pub version: Option<String>,
}

impl Extension {
    /// Create an extension declaration with no pinned version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Pin a specific version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Version for comparison purposes, treating `None` as `""`.
    pub fn version_or_empty(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_version_compares_as_empty() {
        let a = Extension::new("pg_trgm");
        let b = Extension::new("pg_trgm").with_version("");
        assert_eq!(a.version_or_empty(), b.version_or_empty());
    }
}
