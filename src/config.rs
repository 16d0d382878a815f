//! Global configuration parsing, validation, and environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{AppError, Result};

/// Environment variable overriding [`GlobalConfig::host`].
pub const HOST_ENV: &str = "HOST";
/// Environment variable overriding [`GlobalConfig::http_port`].
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding [`GlobalConfig::db_path`].
pub const DB_PATH_ENV: &str = "NOTES_DB_PATH";

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_http_port() -> u16 {
    8000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("notes.db")
}

fn default_max_connections() -> u32 {
    8
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Global configuration parsed from an optional `config.toml`.
///
/// Every field has a default, so an empty document (or no file at all)
/// yields a usable configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GlobalConfig {
    /// Interface the HTTP listener binds to.
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port for the streamable MCP transport and liveness endpoint.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Path of the `SQLite` database file holding the notes table.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Upper bound on pooled `SQLite` connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a writer waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            db_path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `NOTES_DB_PATH` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is set but not a valid port.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides using `lookup` to resolve variable names.
    ///
    /// Empty values are ignored so that `PORT=` behaves like an unset variable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the port value does not parse.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host) = read(HOST_ENV) {
            debug!(%host, "host overridden from environment");
            self.host = host;
        }

        if let Some(port) = read(PORT_ENV) {
            self.http_port = port.trim().parse().map_err(|err| {
                AppError::Config(format!("{PORT_ENV} must be a port number, got '{port}': {err}"))
            })?;
            debug!(port = self.http_port, "port overridden from environment");
        }

        if let Some(path) = read(DB_PATH_ENV) {
            debug!(%path, "database path overridden from environment");
            self.db_path = PathBuf::from(path);
        }

        self.validate()
    }

    /// Path to the notes database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Busy timeout as a [`Duration`].
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(AppError::Config(
                "max_connections must be greater than zero".into(),
            ));
        }

        if self.host.trim().is_empty() {
            return Err(AppError::Config("host must not be empty".into()));
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("db_path must not be empty".into()));
        }

        Ok(())
    }
}
