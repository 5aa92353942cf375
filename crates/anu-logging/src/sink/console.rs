//! Console sink writing to standard output.

use log::LevelFilter;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};

/// Writes each rendered line to stdout (or an injected writer).
pub struct ConsoleSink {
    level: LevelFilter,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink bound to the process's standard output.
    pub fn stdout(level: LevelFilter) -> Self {
        Self::with_writer(level, io::stdout())
    }

    /// Console sink bound to an arbitrary writer.
    pub fn with_writer(level: LevelFilter, writer: impl Write + Send + 'static) -> Self {
        Self {
            level,
            out: Mutex::new(Box::new(writer)),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{line}")?;
        out.flush()
    }

    pub fn flush(&self) -> io::Result<()> {
        self.out.lock().flush()
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
