//! Database role definitions.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single grantable privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Privilege {
    /// `SELECT`.
    Select,
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
}

impl Privilege {
    /// The SQL keyword for this privilege.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// A grant of a set of privileges on one target model to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePrivilege {
    /// Privileges granted.
    pub privileges: Vec<Privilege>,
    /// Target model (table) name.
    pub on: String,
}

impl RolePrivilege {
    /// Create a grant of `privileges` on `on`.
    pub fn new(privileges: Vec<Privilege>, on: impl Into<String>) -> Self {
        Self {
            privileges,
            on: on.into(),
        }
    }
}

/// A database role and the privileges granted to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Role name.
    pub name: String,
    /// Grants held by this role.
    pub privileges: Vec<RolePrivilege>,
}

impl Role {
    /// Create a role with no grants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileges: Vec::new(),
        }
    }

    /// Add a grant.
    pub fn grant(mut self, privileges: Vec<Privilege>, on: impl Into<String>) -> Self {
        self.privileges.push(RolePrivilege::new(privileges, on));
        self
    }

    /// The privilege set as `target -> {privilege...}`, for set-comparison
    /// against another role's grants (spec §4.2.8).
    fn as_grant_map(&self) -> HashMap<&str, HashSet<Privilege>> {
        let mut map: HashMap<&str, HashSet<Privilege>> = HashMap::new();
        for grant in &self.privileges {
            map.entry(grant.on.as_str())
                .or_default()
                .extend(grant.privileges.iter().copied());
        }
        map
    }

    /// Whether this role's granted-privilege set differs from `other`'s.
    pub fn differs_from(&self, other: &Role) -> bool {
        self.as_grant_map() != other.as_grant_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_order_does_not_matter() {
        let a = Role::new("app")
            .grant(vec![Privilege::Select, Privilege::Insert], "User");
        let b = Role::new("app")
            .grant(vec![Privilege::Insert, Privilege::Select], "User");
        assert!(!a.differs_from(&b));
    }

    #[test]
    fn added_privilege_is_a_difference() {
        let a = Role::new("app").grant(vec![Privilege::Select], "User");
        let b = Role::new("app").grant(vec![Privilege::Select, Privilege::Update], "User");
        assert!(a.differs_from(&b));
    }
}
