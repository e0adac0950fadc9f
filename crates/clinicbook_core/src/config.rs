//! Runtime configuration read from environment variables.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - A configured log directory is absolute; relative paths are rejected.
//! - The log level is validated even when no log directory is set.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_FILE_VAR: &str = "CLINICBOOK_DATA_FILE";
pub const LOG_DIR_VAR: &str = "CLINICBOOK_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "CLINICBOOK_LOG_LEVEL";
pub const DEFAULT_DATA_FILE: &str = "data/clinicbook.sqlite3";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_VAR}: {message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_VAR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Where and how verbosely the shell logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Absolute directory for the rolling log files.
    pub dir: PathBuf,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file holding the book snapshot.
    pub data_file: PathBuf,
    /// Logging stays off when `None`.
    pub log: Option<LogSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log: None,
        }
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Maps a level name onto the canonical `log` level names.
///
/// # Errors
/// - Returns the rejected name for anything outside trace|debug|info|warn|error.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    /// - See [`AppConfig::from_lookup`].
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    ///
    /// # Errors
    /// - `InvalidLogLevel` for an unsupported level name.
    /// - `RelativeLogDir` when the log directory is not absolute.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_file = read(DATA_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let level = match read(LOG_LEVEL_VAR) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };
        let log = match read(LOG_DIR_VAR) {
            Some(raw) if !Path::new(&raw).is_absolute() => {
                return Err(ConfigError::RelativeLogDir(PathBuf::from(raw)));
            }
            Some(raw) => Some(LogSettings {
                dir: PathBuf::from(raw),
                level,
            }),
            None => None,
        };

        Ok(Self { data_file, log })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_level, AppConfig, ConfigError, LogSettings, DATA_FILE_VAR, LOG_DIR_VAR,
        LOG_LEVEL_VAR,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.log.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (DATA_FILE_VAR, "   "),
            (LOG_LEVEL_VAR, ""),
        ]))
        .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn explicit_values_are_normalized() {
        let log_dir = std::env::temp_dir().join("clinicbook-logs");
        let config = AppConfig::from_lookup(lookup_from(&[
            (DATA_FILE_VAR, " /tmp/book.sqlite3 "),
            (LOG_DIR_VAR, log_dir.to_str().unwrap()),
            (LOG_LEVEL_VAR, "WARNING"),
        ]))
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/book.sqlite3"));
        assert_eq!(
            config.log,
            Some(LogSettings {
                dir: log_dir,
                level: "warn",
            })
        );
    }

    #[test]
    fn level_without_directory_is_still_checked() {
        let config = AppConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "error")])).unwrap();
        assert!(config.log.is_none());

        assert_eq!(normalize_level(" warning "), Ok("warn"));
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(LOG_DIR_VAR, "logs")])).unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs")));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }
}
