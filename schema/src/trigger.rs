//! Trigger definitions.

use serde::{Deserialize, Serialize};

/// The row/statement level a [`Trigger`] fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerLevel {
    /// `FOR EACH ROW`.
    Row,
    /// `FOR EACH STATEMENT`.
    Statement,
}

impl TriggerLevel {
    /// The SQL fragment for this level.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Row => "FOR EACH ROW",
            Self::Statement => "FOR EACH STATEMENT",
        }
    }
}

/// A trigger on a model.
///
/// Identity for diffing (spec §4.2.9): `(event, level, canonical(execute))`
/// — a change to the trigger body is a new identity, so the trigger
/// orchestrator produces a remove+add pair rather than an "updated" entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Event clause, e.g. `"BEFORE UPDATE"`.
    pub event: String,
    /// Row/statement level.
    pub level: TriggerLevel,
    /// `plpgsql` function body executed by the trigger.
    pub execute: String,
}

impl Trigger {
    /// Create a new trigger.
    pub fn new(event: impl Into<String>, level: TriggerLevel, execute: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            level,
            execute: execute.into(),
        }
    }

    /// The whitespace-collapsed form of `execute`, used for identity
    /// comparison so cosmetic formatting differences don't count as a
    /// trigger body change.
    pub fn canonical_execute(&self) -> String {
        self.execute.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// The diff identity tuple.
    pub fn identity_key(&self) -> (String, TriggerLevel, String) {
        (self.event.clone(), self.level, self.canonical_execute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_execute_strips_whitespace_differences() {
        let a = Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "  BEGIN  NEW.x := 1; END; ");
        let b = Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN NEW.x := 1; END;");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn different_body_is_a_different_identity() {
        let a = Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN NEW.x := 1; END;");
        let b = Trigger::new("BEFORE UPDATE", TriggerLevel::Row, "BEGIN NEW.x := 2; END;");
        assert_ne!(a.identity_key(), b.identity_key());
    }
}
