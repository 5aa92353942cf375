//! Error types for config loading and lookups.

use thiserror::Error;

/// Errors returned while loading, merging, or reading config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config source or walking the defaults directory failed.
    #[error("failed to read config {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// A document was syntactically malformed.
    #[error("failed to parse config {origin}{}: {message}", location(.line, .column))]
    ParseFailed {
        origin: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },
    /// A present value had the wrong type or could not be resolved.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(origin: &str, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::ParseFailed {
            origin: origin.to_string(),
            line,
            column: None,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" (line {line}, column {column})"),
        (Some(line), None) => format!(" (line {line})"),
        _ => String::new(),
    }
}
