//! Server configuration.

use std::env;

/// Which persistence backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite database via sqlx.
    Sqlite,
    /// Flat JSON files in a data directory.
    Local,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Persistence backend.
    pub storage: StorageBackend,
    /// Database URL (sqlite backend).
    pub database_url: String,
    /// Data directory (local backend).
    pub data_dir: String,
    /// Admin PIN for privileged operations.
    pub admin_pin: String,
    /// Staleness sweep interval in seconds.
    pub sweep_interval_secs: u64,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = match env::var("TEMPO_STORAGE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StorageBackend::Sqlite,
            "local" => StorageBackend::Local,
            other => anyhow::bail!("Unknown TEMPO_STORAGE backend: {other}"),
        };

        Ok(Self {
            host: env::var("TEMPO_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("TEMPO_SERVER_PORT")
                .unwrap_or_else(|_| "8390".to_string())
                .parse()
                .unwrap_or(8390),
            storage,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:tempo.db?mode=rwc".to_string()),
            data_dir: env::var("TEMPO_DATA_DIR").unwrap_or_else(|_| "tempo-data".to_string()),
            admin_pin: env::var("TEMPO_ADMIN_PIN").unwrap_or_else(|_| "1234".to_string()),
            sweep_interval_secs: env::var("TEMPO_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            log_level: env::var("TEMPO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
