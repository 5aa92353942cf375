//! Process logging bootstrap driven by merged configuration.
//!
//! Reads the `global` and `logging` sections of a `ConfigTree`, builds the
//! enabled sinks (rotating file, console, UDP datagram) and installs a single
//! process-wide logger behind the `log` facade.

mod bootstrap;
mod error;
mod logger;
mod record;
mod settings;
mod sink;

/// Startup entry points.
pub use bootstrap::{bootstrap, bootstrap_with, build_logger, build_sinks, process_logger};
/// Public error type returned by bootstrap.
pub use error::LoggingError;
/// The dispatcher installed behind the `log` facade.
pub use logger::ProcessLogger;
/// A captured log record and its renderings.
pub use record::{LogRecord, severity_name};
/// Resolved sink options and their fallbacks.
pub use settings::{
    DEFAULT_BACKUP_COUNT, DEFAULT_DATAGRAM_HOST, DEFAULT_DATAGRAM_PORT, DEFAULT_MAX_BYTES,
    DEFAULT_PREFIX, LogSinkConfig, parse_level,
};
/// Sink variants.
pub use sink::{ConsoleSink, DatagramSink, RotatingFileSink, Sink};
