//! Application state.

use std::sync::Arc;

use shift_store::ShiftStore;
use tokio::sync::RwLock;
use tracker::{AdminSession, Tracker};

use crate::config::Config;
use crate::error::{ServerError, ServerResult};

/// Shared application state.
pub struct AppState<S: ShiftStore> {
    /// Server configuration.
    pub config: Config,
    /// The attendance engine. Handlers take the write lock for mutations,
    /// which serializes lifecycle operations per process. The reconciler
    /// holds a clone of this handle.
    pub tracker: Arc<RwLock<Tracker<S>>>,
}

impl<S: ShiftStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, tracker: Tracker<S>) -> Self {
        Self {
            config,
            tracker: Arc::new(RwLock::new(tracker)),
        }
    }

    /// Mints a session from an optional PIN supplied with a request.
    /// A correct PIN yields an elevated session; anything else is a guest.
    pub fn session_for(&self, pin: Option<&str>) -> AdminSession {
        match pin {
            Some(pin) if pin == self.config.admin_pin => AdminSession::admin(),
            _ => AdminSession::guest(),
        }
    }

    /// Like [`AppState::session_for`] but rejects outright when the PIN is
    /// wrong, so handlers can fail before touching the engine.
    pub fn require_admin(&self, pin: Option<&str>) -> ServerResult<AdminSession> {
        let session = self.session_for(pin);
        if session.is_admin() {
            Ok(session)
        } else {
            Err(ServerError::AdminRequired)
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

#[cfg(test)]
mod tests {
    use shift_store::MemoryStore;
    use tracker::Tracker;

    use super::*;
    use crate::config::StorageBackend;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            storage: StorageBackend::Local,
            database_url: String::new(),
            data_dir: String::new(),
            admin_pin: "4321".to_string(),
            sweep_interval_secs: 60,
            log_level: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_pin_mints_session() {
        let tracker = Tracker::new(Arc::new(MemoryStore::new()));
        let state = AppState::new(test_config(), tracker);

        assert!(state.session_for(Some("4321")).is_admin());
        assert!(!state.session_for(Some("0000")).is_admin());
        assert!(!state.session_for(None).is_admin());

        assert!(state.require_admin(Some("4321")).is_ok());
        assert!(matches!(
            state.require_admin(Some("0000")),
            Err(ServerError::AdminRequired)
        ));
    }
}
