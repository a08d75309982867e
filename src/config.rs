use crate::cli::Cli;
use crate::error::{Result, TaskError};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration parsed from environment variables.
///
/// Optional (defaults in parentheses):
///   APP_HOST                        bind address ("0.0.0.0")
///   APP_PORT                        listen port (8080)
///   APP_NAME                        reported by /api/health/report ("tasktree")
///   APP_VERSION                     reported by /api/health/report ("dev")
///   TASKTREE_DB_PATH                SQLite file ("tasktree.db")
///   TASKTREE_DB_MAX_CONNECTIONS     pool size (5)
///   TASKTREE_REQUEST_TIMEOUT_SECS   per-request deadline (30)
///   TASKTREE_TRANSLATIONS_DIR       directory of `<lang>.json` catalogs
///   TASKTREE_LOG_FILE               write logs here instead of stdout
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub app_name: String,
    pub app_version: String,
    pub db_path: PathBuf,
    pub db_max_connections: u32,
    pub request_timeout: Duration,
    pub translations_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            app_name: "tasktree".into(),
            app_version: "dev".into(),
            db_path: PathBuf::from("tasktree.db"),
            db_max_connections: 5,
            request_timeout: Duration::from_secs(30),
            translations_dir: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let db_max_connections: u32 =
            parse_env("TASKTREE_DB_MAX_CONNECTIONS", defaults.db_max_connections)?;
        if db_max_connections == 0 {
            return Err(TaskError::InvalidConfig(
                "TASKTREE_DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }

        let timeout_secs: u64 = parse_env(
            "TASKTREE_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(TaskError::InvalidConfig(
                "TASKTREE_REQUEST_TIMEOUT_SECS must be at least 1".into(),
            ));
        }

        Ok(Self {
            host: env_string("APP_HOST").unwrap_or(defaults.host),
            port: parse_env("APP_PORT", defaults.port)?,
            app_name: env_string("APP_NAME").unwrap_or(defaults.app_name),
            app_version: env_string("APP_VERSION").unwrap_or(defaults.app_version),
            db_path: env_string("TASKTREE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            db_max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
            translations_dir: env_string("TASKTREE_TRANSLATIONS_DIR").map(PathBuf::from),
            log_file: env_string("TASKTREE_LOG_FILE").map(PathBuf::from),
        })
    }

    /// Command-line flags win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(db) = &cli.db {
            self.db_path = db.clone();
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Empty values count as unset.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env_string(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| TaskError::InvalidConfig(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
