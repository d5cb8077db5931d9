//! Admin capability passed to privileged operations.
//!
//! The credential check itself (a static PIN) lives at the edge; the engine
//! only looks at the resulting capability, never at ambient global state.

use crate::{TrackerError, TrackerResult};

/// Session context carried into operations that require elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    admin: bool,
}

impl AdminSession {
    /// A session that passed the admin credential check.
    pub fn admin() -> Self {
        Self { admin: true }
    }

    /// An unprivileged session.
    pub fn guest() -> Self {
        Self { admin: false }
    }

    /// Whether this session is elevated.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Errors unless the session is elevated.
    pub fn require_admin(&self) -> TrackerResult<()> {
        if self.admin {
            Ok(())
        } else {
            Err(TrackerError::AdminRequired)
        }
    }
}
