//! Environment-backed server configuration.
//!
//! # Responsibility
//! - Read and normalize the handful of environment variables the server
//!   accepts; reject unusable values at startup with readable errors.
//!
//! # Invariants
//! - Unset variables fall back to documented defaults.
//! - `TODOSTORE_LOG_DIR` unset or blank selects stderr-only logging.

use todostore_core::default_log_level;

const DEFAULT_DB_PATH: &str = "todostore.sqlite3";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite database file path; `:memory:` selects an in-memory store.
    pub db_path: String,
    /// Absolute log directory. `None` selects stderr-only logging.
    pub log_dir: Option<String>,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// Variables: `TODOSTORE_DB_PATH`, `TODOSTORE_LOG_DIR`,
    /// `TODOSTORE_LOG_LEVEL`, `HOST`, `PORT`.
    ///
    /// # Errors
    /// - Returns a readable error when `PORT` is not an integer in 1–65535.
    pub fn from_env() -> Result<Self, String> {
        let port = match std::env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            db_path: env_or("TODOSTORE_DB_PATH", DEFAULT_DB_PATH),
            log_dir: non_blank(std::env::var("TODOSTORE_LOG_DIR").ok()),
            log_level: env_or("TODOSTORE_LOG_LEVEL", default_log_level()),
            host: env_or("HOST", DEFAULT_HOST),
            port,
        })
    }

    /// Returns the `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(name: &str, default: &str) -> String {
    non_blank(std::env::var(name).ok()).unwrap_or_else(|| default.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_port(raw: &str) -> Result<u16, String> {
    let trimmed = raw.trim();
    match trimmed.parse::<u16>() {
        Ok(0) => Err("invalid PORT value `0`; expected an integer in 1-65535".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "invalid PORT value `{trimmed}`; expected an integer in 1-65535"
        )),
    }
}
