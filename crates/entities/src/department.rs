//! Department definitions.
//!
//! Departments are identified by name; renaming is a key change, not an
//! attribute change. Their ordering rank equals their list position.

use serde::{Deserialize, Serialize};

/// Sentinel department for users without an assignment and the fallback when
/// a department is deleted with no others remaining.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// A department row as persisted by relational backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Department {
    /// Name, the primary key.
    pub name: String,
    /// Ordering rank (list position).
    pub rank: i64,
}

impl Department {
    /// Creates a department at the given list position.
    pub fn new(name: impl Into<String>, rank: i64) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }
}
