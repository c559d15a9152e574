//! Runtime configuration.
//!
//! Settings are resolved in layers: built-in defaults, then an optional YAML
//! file, then `LEDGER_*` environment variables. Command-line flags are
//! applied last by the CLI.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::RepositoryOptions;

pub const ENV_CONFIG: &str = "LEDGER_CONFIG";
pub const ENV_DB_HOST: &str = "LEDGER_DB_HOST";
pub const ENV_DB_NAME: &str = "LEDGER_DB_NAME";
pub const ENV_DB_USER: &str = "LEDGER_DB_USER";
pub const ENV_DB_PASSWORD: &str = "LEDGER_DB_PASSWORD";
pub const ENV_DB_CONNECT_TIMEOUT: &str = "LEDGER_DB_CONNECT_TIMEOUT_SECS";
pub const ENV_STRICT_AFFECTED_ROWS: &str = "LEDGER_STRICT_AFFECTED_ROWS";
pub const ENV_READ_FAILURES: &str = "LEDGER_READ_FAILURES";
pub const ENV_CAMPAIGN_DELETE: &str = "LEDGER_CAMPAIGN_DELETE";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}")]
    #[diagnostic(code(ledger::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {message}")]
    #[diagnostic(
        code(ledger::config::parse),
        help("The file must be YAML with optional `store` and `repository` sections.")
    )]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {var}: {message}")]
    #[diagnostic(code(ledger::config::env))]
    InvalidEnv {
        var: String,
        value: String,
        message: String,
    },
}

/// Where and how to reach the relational store.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Network address of the store. The embedded store has none.
    pub host: Option<String>,
    /// Database file path, or `:memory:`.
    pub database: PathBuf,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Bound on establishing a connection and on waiting for store locks.
    #[serde(with = "crate::serde_utils::duration_secs")]
    pub connect_timeout: Duration,
    pub create_if_missing: bool,
    pub foreign_keys: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: None,
            database: default_db_path(),
            user: None,
            password: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            create_if_missing: true,
            foreign_keys: true,
        }
    }
}

impl StoreConfig {
    /// Defaults pointed at a specific database file.
    pub fn at<P: Into<PathBuf>>(database: P) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout", &self.connect_timeout)
            .field("create_if_missing", &self.create_if_missing)
            .field("foreign_keys", &self.foreign_keys)
            .finish()
    }
}

/// Everything needed to construct a database handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    pub repository: RepositoryOptions,
}

impl Settings {
    /// Resolve defaults, the config file and the process environment.
    ///
    /// An explicit `config_path` wins over `LEDGER_CONFIG`; with neither,
    /// no file is read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(config_path, |key| env::var(key).ok())
    }

    /// [`Settings::load`] with variables obtained through `lookup`.
    pub fn load_from<F>(config_path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup(ENV_CONFIG).map(PathBuf::from);
        let mut settings = match config_path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env_from(lookup)?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Overlay `LEDGER_*` variables obtained through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_DB_HOST) {
            self.store.host = Some(host);
        }
        if let Some(name) = lookup(ENV_DB_NAME) {
            self.store.database = PathBuf::from(name);
        }
        if let Some(user) = lookup(ENV_DB_USER) {
            self.store.user = Some(user);
        }
        if let Some(password) = lookup(ENV_DB_PASSWORD) {
            self.store.password = Some(password);
        }
        if let Some(secs) = lookup(ENV_DB_CONNECT_TIMEOUT) {
            let parsed: u64 = secs
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid_env(ENV_DB_CONNECT_TIMEOUT, &secs, e))?;
            self.store.connect_timeout = Duration::from_secs(parsed);
        }
        if let Some(value) = lookup(ENV_STRICT_AFFECTED_ROWS) {
            self.repository.affected_rows = value
                .parse()
                .map_err(|e| invalid_env(ENV_STRICT_AFFECTED_ROWS, &value, e))?;
        }
        if let Some(value) = lookup(ENV_READ_FAILURES) {
            self.repository.read_failures = value
                .parse()
                .map_err(|e| invalid_env(ENV_READ_FAILURES, &value, e))?;
        }
        if let Some(value) = lookup(ENV_CAMPAIGN_DELETE) {
            self.repository.delete_policy = value
                .parse()
                .map_err(|e| invalid_env(ENV_CAMPAIGN_DELETE, &value, e))?;
        }
        Ok(())
    }
}

fn invalid_env(var: &str, value: &str, err: impl fmt::Display) -> ConfigError {
    ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
        message: err.to_string(),
    }
}

/// XDG data directory for the ledger: `$XDG_DATA_HOME/ledger` or
/// `~/.local/share/ledger`. Falls back to the working directory when
/// neither variable is set.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var_os("XDG_DATA_HOME"), env::var_os("HOME"))
}

pub(crate) fn data_dir_from(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ledger")
}

/// Default database file: `<data dir>/ledger.db`.
pub fn default_db_path() -> PathBuf {
    get_data_dir().join("ledger.db")
}
