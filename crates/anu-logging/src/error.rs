//! Error types for logging bootstrap.

use anu_config::ConfigError;
use thiserror::Error;

/// Errors returned while resolving options or constructing sinks.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A logging option was present but invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Creating the log directory, opening the log file, or binding the
    /// datagram socket failed.
    #[error("failed to prepare log sink at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Some other logger already owns the `log` facade.
    #[error("failed to install process logger: {0}")]
    Install(#[from] log::SetLoggerError),
}

impl LoggingError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
