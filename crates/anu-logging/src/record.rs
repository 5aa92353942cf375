//! Captured log records, the shared line layout, and the datagram payload.

use chrono::Local;
use log::Level;
use serde::Serialize;

/// Timestamp layout shared by every sink (`2024-01-31 12:00:00,123`).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Owned snapshot of one log call.
///
/// Field order is the key order of the datagram JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub module: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    #[serde(rename = "levelname")]
    pub level_name: &'static str,
    #[serde(rename = "pathname")]
    pub path: String,
    #[serde(rename = "lineno")]
    pub line: u32,
    pub message: String,
    pub prefix: String,
    #[serde(skip)]
    pub level: Level,
}

impl LogRecord {
    /// Capture a `log` record, stamping it with the current local time.
    pub fn capture(record: &log::Record<'_>, prefix: &str) -> Self {
        Self {
            module: record.module_path().unwrap_or(record.target()).to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level_name: severity_name(record.level()),
            path: record.file().unwrap_or("<unknown>").to_string(),
            line: record.line().unwrap_or(0),
            message: record.args().to_string(),
            prefix: prefix.to_string(),
            level: record.level(),
        }
    }

    /// `[<prefix>] - [<timestamp>][<severity>][<path>:<line>]: <message>`
    pub fn render_line(&self) -> String {
        format!(
            "[{}] - [{}][{}][{}:{}]: {}",
            self.prefix, self.timestamp, self.level_name, self.path, self.line, self.message
        )
    }

    /// Compact JSON document encoded as UTF-8.
    pub fn datagram_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Upper-case severity name used in rendered records.
pub fn severity_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
