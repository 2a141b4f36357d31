//! Settings resolved from command-line flags and environment variables.

use std::path::{Path, PathBuf};

use crate::infra::db::DB_FILE;

/// Default "too short to save" threshold, in seconds.
pub const DEFAULT_MIN_LOG_SECS: i64 = 60;

/// Log file written next to the database when logging is enabled.
pub const LOG_FILE: &str = "hours.log";

const DB_EXTENSION: &str = "db";

/// Failures while resolving [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine your home directory; pass --dbpath explicitly")]
    NoHomeDir,
    #[error("db file needs to end with \".db\", got \"{0}\"")]
    DbPathExtension(String),
    #[error("--min-log-secs cannot be negative, got {0}")]
    NegativeMinLogSecs(i64),
}

/// Resolved settings for one run of `hours`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_file: PathBuf,
    pub min_log_secs: i64,
}

impl Config {
    /// Resolves raw flag values against `home`.
    ///
    /// `db_path` defaults to `~/hours.db` and may start with `~/`. The log file
    /// defaults to `hours.log` next to the database.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the database path lacks the `.db`
    /// extension, no home directory is known for a path that needs one, or the
    /// threshold is negative.
    pub fn resolve(
        db_path: Option<&str>,
        log_file: Option<&Path>,
        min_log_secs: i64,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let db_path = match db_path {
            Some(db_path) if db_path.starts_with("~/") => {
                expand_tilde(db_path, home.ok_or(ConfigError::NoHomeDir)?)
            }
            Some(db_path) => PathBuf::from(db_path),
            None => home.ok_or(ConfigError::NoHomeDir)?.join(DB_FILE),
        };

        if db_path.extension().and_then(|extension| extension.to_str()) != Some(DB_EXTENSION) {
            return Err(ConfigError::DbPathExtension(db_path.display().to_string()));
        }
        if min_log_secs < 0 {
            return Err(ConfigError::NegativeMinLogSecs(min_log_secs));
        }

        let log_file = log_file.map_or_else(
            || db_path.with_file_name(LOG_FILE),
            Path::to_path_buf,
        );

        Ok(Self {
            db_path,
            log_file,
            min_log_secs,
        })
    }
}

/// Replaces a leading `~/` with `home`.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}
