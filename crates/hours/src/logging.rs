//! Tracing setup. The TUI owns stdout, so events are appended to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable holding the filter directives, e.g. `hours=debug`.
pub const LOG_ENV: &str = "HOURS_LOG";

/// Failures while installing the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid {LOG_ENV} filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Appends events matching `directives` to `log_file`.
///
/// # Errors
/// Returns [`LoggingError`] if the directives do not parse, the file cannot
/// be opened, or a global subscriber is already installed.
pub fn init(directives: &str, log_file: &Path) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(directives)?;

    let open_error = |source| LoggingError::Open {
        path: log_file.to_path_buf(),
        source,
    };
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(open_error)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(open_error)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| LoggingError::Install(error.to_string()))?;

    tracing::info!(log_file = %log_file.display(), "logging initialized");

    Ok(())
}
