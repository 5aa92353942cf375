//! Destinations for formatted log records.
//!
//! The set of sinks is closed: a rotating file, the console, and a UDP
//! datagram target. Each sink serializes its own physical writes, so records
//! bound for different sinks never contend on a shared lock.

mod console;
mod datagram;
mod file;

pub use console::ConsoleSink;
pub use datagram::DatagramSink;
pub use file::RotatingFileSink;

use crate::LogRecord;
use log::{Level, LevelFilter};
use std::io;

/// One enabled destination registered with the process logger.
#[derive(Debug)]
pub enum Sink {
    File(RotatingFileSink),
    Console(ConsoleSink),
    Datagram(DatagramSink),
}

impl Sink {
    /// Minimum severity this sink accepts.
    pub fn level(&self) -> LevelFilter {
        match self {
            Self::File(sink) => sink.level(),
            Self::Console(sink) => sink.level(),
            Self::Datagram(sink) => sink.level(),
        }
    }

    /// Whether a record of `level` passes this sink's own filter.
    pub fn accepts(&self, level: Level) -> bool {
        level <= self.level()
    }

    /// Short name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Console(_) => "console",
            Self::Datagram(_) => "datagram",
        }
    }

    /// Deliver one record.
    pub fn emit(&self, record: &LogRecord) -> io::Result<()> {
        match self {
            Self::File(sink) => sink.write_line(&record.render_line()),
            Self::Console(sink) => sink.write_line(&record.render_line()),
            Self::Datagram(sink) => {
                sink.send(record);
                Ok(())
            }
        }
    }

    /// Flush buffered output, if any.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Self::File(sink) => sink.flush(),
            Self::Console(sink) => sink.flush(),
            Self::Datagram(_) => Ok(()),
        }
    }
}

impl From<RotatingFileSink> for Sink {
    fn from(sink: RotatingFileSink) -> Self {
        Self::File(sink)
    }
}

impl From<ConsoleSink> for Sink {
    fn from(sink: ConsoleSink) -> Self {
        Self::Console(sink)
    }
}

impl From<DatagramSink> for Sink {
    fn from(sink: DatagramSink) -> Self {
        Self::Datagram(sink)
    }
}
