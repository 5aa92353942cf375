//! The process-wide dispatcher behind the `log` facade.

use crate::{LogRecord, Sink};
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::RwLock;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Fans each accepted record out to every registered sink.
///
/// Sinks can only be added. A record is filtered twice: once against the
/// logger's level and once against each sink's own level.
#[derive(Debug)]
pub struct ProcessLogger {
    level: RwLock<LevelFilter>,
    prefix: RwLock<String>,
    sinks: RwLock<Vec<Sink>>,
    last_resort: AtomicBool,
}

impl ProcessLogger {
    /// Create a logger with no sinks.
    ///
    /// Until `disable_last_resort` is called, warnings and errors that find
    /// no sink at all are printed to stderr.
    pub fn new(level: LevelFilter, prefix: impl Into<String>) -> Self {
        Self {
            level: RwLock::new(level),
            prefix: RwLock::new(prefix.into()),
            sinks: RwLock::new(Vec::new()),
            last_resort: AtomicBool::new(true),
        }
    }

    pub fn level(&self) -> LevelFilter {
        *self.level.read()
    }

    pub fn set_level(&self, level: LevelFilter) {
        *self.level.write() = level;
    }

    pub fn prefix(&self) -> String {
        self.prefix.read().clone()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        *self.prefix.write() = prefix.into();
    }

    /// Register another sink.
    pub fn add_sink(&self, sink: impl Into<Sink>) {
        self.sinks.write().push(sink.into());
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Kinds of the registered sinks, in registration order.
    pub fn sink_kinds(&self) -> Vec<&'static str> {
        self.sinks.read().iter().map(Sink::kind).collect()
    }

    /// Stop printing unrouted warnings to stderr.
    pub fn disable_last_resort(&self) {
        self.last_resort.store(false, Ordering::Release);
    }

    pub fn last_resort_enabled(&self) -> bool {
        self.last_resort.load(Ordering::Acquire)
    }

    /// Dispatch an already-captured record.
    pub fn dispatch(&self, record: &LogRecord) {
        let sinks = self.sinks.read();
        if sinks.is_empty() {
            if self.last_resort_enabled() && record.level <= Level::Warn {
                let _ = writeln!(io::stderr(), "{}", record.message);
            }
            return;
        }
        for sink in sinks.iter().filter(|sink| sink.accepts(record.level)) {
            if let Err(err) = sink.emit(record) {
                report_sink_failure(sink, &err);
            }
        }
    }
}

impl Log for ProcessLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let captured = LogRecord::capture(record, &self.prefix.read());
        self.dispatch(&captured);
    }

    fn flush(&self) {
        for sink in self.sinks.read().iter() {
            if let Err(err) = sink.flush() {
                report_sink_failure(sink, &err);
            }
        }
    }
}

/// A failing sink must not take the caller down; note it on stderr.
fn report_sink_failure(sink: &Sink, err: &io::Error) {
    let _ = writeln!(io::stderr(), "--- logging error: {} sink: {err}", sink.kind());
}
