//! Runtime configuration loaded from the environment.
//!
//! Recognized variables:
//! - `SLEEPLOG_DB_PATH`: SQLite file path, default `sleeplog.sqlite3`.
//! - `SLEEPLOG_LOG_LEVEL`: `trace|debug|info|warn|error`, default depends on
//!   build mode.
//! - `SLEEPLOG_LOG_DIR`: absolute directory for rolling log files. File
//!   logging stays off when unset.
//!
//! A `.env` file in the working directory is read first; real environment
//! variables win over it.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SLEEPLOG_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "SLEEPLOG_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SLEEPLOG_LOG_DIR";

const DEFAULT_DB_PATH: &str = "sleeplog.sqlite3";

/// Error raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but blank.
    EmptyValue(&'static str),
    /// Log level name is not recognized.
    InvalidLogLevel(String),
    /// Log directory must be absolute.
    RelativeLogDir(PathBuf),
    /// `.env` exists but could not be read or parsed.
    DotEnv(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(var) => write!(f, "{var} is set but empty"),
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_VAR}: {message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_VAR} must be an absolute path, got `{}`",
                path.display()
            ),
            Self::DotEnv(message) => write!(f, "failed to load .env: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env` when present, then reads the process environment.
    ///
    /// # Errors
    /// - `DotEnv` when a `.env` file exists but is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        accept_missing_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DB_PATH_VAR) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyValue(DB_PATH_VAR));
            }
            config.db_path = PathBuf::from(trimmed);
        }

        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            config.log_level = normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?;
        }

        if let Some(raw) = lookup(LOG_DIR_VAR) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let dir = PathBuf::from(trimmed);
                if !dir.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(dir));
                }
                config.log_dir = Some(dir);
            }
        }

        Ok(config)
    }
}

/// Treats an absent `.env` as empty; any other load failure is an error.
fn accept_missing_dotenv<T>(
    outcome: Result<T, dotenvy::Error>,
) -> Result<Option<T>, ConfigError> {
    match outcome {
        Ok(loaded) => Ok(Some(loaded)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(ConfigError::DotEnv(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        accept_missing_dotenv, AppConfig, ConfigError, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR,
    };
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("sleeplog.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let log_dir = std::env::temp_dir().join("sleeplog-logs");
        let log_dir_text = log_dir.to_string_lossy().into_owned();
        let config = AppConfig::from_lookup(lookup_from(&[
            (DB_PATH_VAR, " data/survey.db "),
            (LOG_LEVEL_VAR, "WARNING"),
            (LOG_DIR_VAR, log_dir_text.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("data/survey.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(DB_PATH_VAR, "  ")])),
            Err(ConfigError::EmptyValue(DB_PATH_VAR))
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "loud")])),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(LOG_DIR_VAR, "logs")])),
            Err(ConfigError::RelativeLogDir(PathBuf::from("logs")))
        );
    }

    #[test]
    fn blank_log_dir_disables_file_logging() {
        let config = AppConfig::from_lookup(lookup_from(&[(LOG_DIR_VAR, "")])).unwrap();
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn missing_dotenv_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = accept_missing_dotenv(dotenvy::from_path(dir.path().join(".env")));
        assert_eq!(outcome, Ok(None));
    }

    #[test]
    fn malformed_dotenv_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "SLEEPLOG_UNUSED_KEY='unterminated\n").unwrap();

        let outcome = accept_missing_dotenv(dotenvy::from_path(&path));
        assert!(matches!(outcome, Err(ConfigError::DotEnv(_))));
    }
}
