//! One-time process logging bootstrap.
//!
//! `bootstrap` is meant to run exactly once, early in `main`. Calling it
//! again attaches another full set of sinks to the same logger.

use crate::{
    ConsoleSink, DatagramSink, LogSinkConfig, LoggingError, ProcessLogger, RotatingFileSink, Sink,
};
use anu_config::ConfigTree;
use log::{debug, info};
use std::fs;
use std::sync::OnceLock;

static PROCESS_LOGGER: OnceLock<ProcessLogger> = OnceLock::new();

/// The installed process logger, if `bootstrap` has run.
pub fn process_logger() -> Option<&'static ProcessLogger> {
    PROCESS_LOGGER.get()
}

/// Resolve logging options from the merged tree and install the sinks.
pub fn bootstrap(tree: &ConfigTree) -> Result<&'static ProcessLogger, LoggingError> {
    let config = LogSinkConfig::from_tree(tree)?;
    bootstrap_with(&config)
}

/// Install sinks for already-resolved options.
///
/// The first call registers the process logger with the `log` facade. Sinks
/// are built before any global state is touched, so a failed bootstrap
/// leaves the process logger as it was.
pub fn bootstrap_with(config: &LogSinkConfig) -> Result<&'static ProcessLogger, LoggingError> {
    let sinks = build_sinks(config)?;

    let mut first_install = false;
    let logger = PROCESS_LOGGER.get_or_init(|| {
        first_install = true;
        ProcessLogger::new(config.level, config.prefix.clone())
    });
    if first_install {
        log::set_logger(logger)?;
    } else {
        logger.set_level(config.level);
        logger.set_prefix(config.prefix.clone());
    }
    log::set_max_level(config.level);
    logger.disable_last_resort();
    for sink in sinks {
        logger.add_sink(sink);
    }

    info!(
        "logging initialized (prefix={}, level={}, sinks={:?})",
        config.prefix,
        config.level,
        logger.sink_kinds()
    );
    Ok(logger)
}

/// Build a standalone logger for the given options without installing it.
pub fn build_logger(config: &LogSinkConfig) -> Result<ProcessLogger, LoggingError> {
    let logger = ProcessLogger::new(config.level, config.prefix.clone());
    logger.disable_last_resort();
    for sink in build_sinks(config)? {
        logger.add_sink(sink);
    }
    Ok(logger)
}

/// Construct the enabled sinks in file, console, datagram order.
///
/// Each sink's level equals the logger level.
pub fn build_sinks(config: &LogSinkConfig) -> Result<Vec<Sink>, LoggingError> {
    let mut sinks = Vec::new();

    if config.file_log {
        fs::create_dir_all(&config.log_dir)
            .map_err(|err| LoggingError::io(config.log_dir.display().to_string(), err))?;
        let path = config.log_file_path();
        let sink =
            RotatingFileSink::open(&path, config.max_bytes, config.backup_count, config.level)
                .map_err(|err| LoggingError::io(path.display().to_string(), err))?;
        debug!("file sink ready (path={})", path.display());
        sinks.push(Sink::File(sink));
    }

    if config.stdout {
        sinks.push(Sink::Console(ConsoleSink::stdout(config.level)));
    }

    if config.datagram_log {
        let sink = DatagramSink::connect(&config.host, config.port, config.level)
            .map_err(|err| LoggingError::io(format!("{}:{}", config.host, config.port), err))?;
        debug!("datagram sink ready (target={})", sink.destination());
        sinks.push(Sink::Datagram(sink));
    }

    Ok(sinks)
}
