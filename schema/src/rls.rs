//! Row-Level Security table flags.

use serde::{Deserialize, Serialize};

/// Row-Level Security state for a model (spec §3): whether RLS is enabled,
/// and whether it is additionally forced for table owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLevelSecurity {
    /// `ALTER TABLE ... ENABLE ROW LEVEL SECURITY`.
    pub enabled: bool,
    /// `ALTER TABLE ... FORCE ROW LEVEL SECURITY`.
    pub force: bool,
}

impl RowLevelSecurity {
    /// RLS enabled, not forced.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            force: false,
        }
    }

    /// RLS enabled and forced.
    pub fn enabled_forced() -> Self {
        Self {
            enabled: true,
            force: true,
        }
    }
}
