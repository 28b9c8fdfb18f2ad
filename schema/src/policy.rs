//! Row-level security policies (`CREATE POLICY`).

use serde::{Deserialize, Serialize};

/// A command a [`Policy`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyCommand {
    /// `SELECT`.
    Select,
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
}

impl PolicyCommand {
    /// The SQL keyword for this command.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// A row-level-security policy on a model.
///
/// Per spec §3/§4.2.7 policies are not alterable in place: any change is
/// rendered as a drop-then-create pair by the policy orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy name, unique within the owning model.
    pub name: String,
    /// Commands this policy governs. An empty list means `FOR ALL`.
    pub commands: Vec<PolicyCommand>,
    /// Roles the policy applies `TO`. Empty means `PUBLIC`.
    pub to_roles: Vec<String>,
    /// `USING` expression body (without surrounding parens).
    pub using_expr: String,
    /// Optional `WITH CHECK` expression body.
    pub check_expr: Option<String>,
}

impl Policy {
    /// Create a policy applying to all commands and `PUBLIC`.
    pub fn new(name: impl Into<String>, using_expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            to_roles: Vec::new(),
            using_expr: using_expr.into(),
            check_expr: None,
        }
    }

    /// Restrict this policy to specific commands.
    pub fn for_commands(mut self, commands: Vec<PolicyCommand>) -> Self {
        self.commands = commands;
        self
    }

    /// Restrict this policy to specific roles.
    pub fn to(mut self, roles: Vec<String>) -> Self {
        self.to_roles = roles;
        self
    }

    /// Attach a `WITH CHECK` expression.
    pub fn with_check(mut self, expr: impl Into<String>) -> Self {
        self.check_expr = Some(expr.into());
        self
    }

    /// The `FOR ...` clause text: `ALL` or a comma-joined command list.
    pub fn for_clause(&self) -> String {
        if self.commands.is_empty() {
            "ALL".to_string()
        } else {
            self.commands
                .iter()
                .map(|c| c.sql())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// The `TO ...` clause text: `public` or a comma-joined role list.
    pub fn to_clause(&self) -> String {
        if self.to_roles.is_empty() {
            "public".to_string()
        } else {
            self.to_roles.join(", ")
        }
    }

    /// Whether `{for, to, using, check}` differ from `other` (spec §4.2.7).
    pub fn differs_from(&self, other: &Policy) -> bool {
        self.commands != other.commands
            || self.to_roles != other.to_roles
            || self.using_expr != other.using_expr
            || self.check_expr != other.check_expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_clause_defaults_to_all() {
        let p = Policy::new("P", "true");
        assert_eq!(p.for_clause(), "ALL");
    }

    #[test]
    fn adding_a_command_is_an_update() {
        let a = Policy::new("P", "id = auth.uid()").for_commands(vec![PolicyCommand::Select]);
        let b = Policy::new("P", "id = auth.uid()")
            .for_commands(vec![PolicyCommand::Select, PolicyCommand::Update]);
        assert!(a.differs_from(&b));
    }
}
