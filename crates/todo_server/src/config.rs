//! Server configuration from environment variables.
//!
//! # Invariants
//! - Every variable has a default except where noted.
//! - `log_dir` is always absolute.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const BIND_ADDR_VAR: &str = "TODO_BIND_ADDR";
pub const DB_PATH_VAR: &str = "TODO_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "TODO_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TODO_LOG_DIR";
pub const SHUTDOWN_GRACE_VAR: &str = "TODO_SHUTDOWN_GRACE_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// `None` keeps the database in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub shutdown_grace: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.var, self.message)
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Reads the process environment, after loading an optional `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let bind_addr = value(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError {
                var: BIND_ADDR_VAR,
                message: err.to_string(),
            })?;

        let log_dir = match value(LOG_DIR_VAR) {
            Some(raw) => PathBuf::from(raw),
            None => std::env::temp_dir().join("todo-server").join("logs"),
        };
        if !log_dir.is_absolute() {
            return Err(ConfigError {
                var: LOG_DIR_VAR,
                message: format!("must be an absolute path, got `{}`", log_dir.display()),
            });
        }

        let shutdown_grace = match value(SHUTDOWN_GRACE_VAR) {
            Some(raw) => raw.parse::<u64>().map_err(|err| ConfigError {
                var: SHUTDOWN_GRACE_VAR,
                message: err.to_string(),
            })?,
            None => DEFAULT_SHUTDOWN_GRACE_SECS,
        };

        Ok(Self {
            bind_addr,
            db_path: value(DB_PATH_VAR).map(PathBuf::from),
            log_level: value(LOG_LEVEL_VAR)
                .unwrap_or_else(|| todo_core::default_log_level().to_string()),
            log_dir,
            shutdown_grace: Duration::from_secs(shutdown_grace),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, BIND_ADDR_VAR, DB_PATH_VAR, LOG_DIR_VAR, SHUTDOWN_GRACE_VAR};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, super::ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_path, None);
        assert!(config.log_dir.is_absolute());
        assert_eq!(config.shutdown_grace, Duration::from_secs(10));
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (DB_PATH_VAR, "/var/lib/todo/todo.db"),
            (SHUTDOWN_GRACE_VAR, " 3 "),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.db_path, Some(PathBuf::from("/var/lib/todo/todo.db")));
        assert_eq!(config.shutdown_grace, Duration::from_secs(3));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(DB_PATH_VAR, "   ")]).unwrap();
        assert_eq!(config.db_path, None);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_from(&[(BIND_ADDR_VAR, "not-an-addr")]).unwrap_err();
        assert_eq!(err.var, BIND_ADDR_VAR);

        let err = config_from(&[(SHUTDOWN_GRACE_VAR, "soon")]).unwrap_err();
        assert_eq!(err.var, SHUTDOWN_GRACE_VAR);

        let err = config_from(&[(LOG_DIR_VAR, "relative/logs")]).unwrap_err();
        assert!(err.to_string().contains(LOG_DIR_VAR));
    }
}
