//! Injectable log sinks.
//!
//! Components never log through process-wide state. The client is built with a
//! [`LogSink`] and hands it to everything it drives, so tests can swap in a
//! [`MemorySink`] and inspect what was emitted. Logging is advisory only and
//! never influences control flow; in particular [`Level::Fatal`] does not
//! terminate the process.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;

/// Severity of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Request-level tracing.
    Debug,
    /// Configuration changes.
    Info,
    /// Degraded results, e.g. missing adjustment factors.
    Warn,
    /// Failed queries.
    Error,
    /// Unrecoverable conditions.
    Fatal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        })
    }
}

/// Destination for diagnostic messages.
pub trait LogSink: Send + Sync + fmt::Debug {
    /// Records a message at the given level.
    fn log(&self, level: Level, message: &str);

    /// Records a debug message.
    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Records an info message.
    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Records a warning.
    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Records an error.
    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Records a fatal condition. Does not exit.
    fn fatal(&self, message: &str) {
        self.log(Level::Fatal, message);
    }
}

/// Shared handle to a log sink.
pub type SharedSink = Arc<dyn LogSink>;

/// Forwards every entry to `tracing` under the `tushare` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates a shared tracing sink.
    #[must_use]
    pub fn shared() -> SharedSink {
        Arc::new(Self)
    }
}

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(target: "tushare", "{message}"),
            Level::Info => tracing::info!(target: "tushare", "{message}"),
            Level::Warn => tracing::warn!(target: "tushare", "{message}"),
            Level::Error => tracing::error!(target: "tushare", "{message}"),
            Level::Fatal => tracing::error!(target: "tushare", fatal = true, "{message}"),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Creates a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for NoopSink {
    fn log(&self, _level: Level, _message: &str) {}
}

/// A recorded log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity.
    pub level: Level,
    /// Formatted message.
    pub message: String,
}

/// Keeps entries in memory.
#[derive(Debug)]
pub struct MemorySink {
    min_level: Level,
    entries: Mutex<Vec<LogEntry>>,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

impl MemorySink {
    /// Creates a sink recording entries at `min_level` and above.
    #[must_use]
    pub const fn new(min_level: Level) -> Self {
        Self {
            min_level,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if an entry at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// Removes all recorded entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, message: &str) {
        if level < self.min_level {
            return;
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                level,
                message: message.to_string(),
            });
    }
}

/// Writes `[timestamp] [LEVEL] message` lines to any writer.
pub struct WriterSink<W> {
    min_level: Level,
    writer: Mutex<W>,
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl<W: io::Write + Send> WriterSink<W> {
    /// Creates a sink writing entries at `min_level` and above to `writer`.
    #[must_use]
    pub const fn new(writer: W, min_level: Level) -> Self {
        Self {
            min_level,
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stdout> {
    /// Creates a sink writing to standard output.
    #[must_use]
    pub fn stdout(min_level: Level) -> Self {
        Self::new(io::stdout(), min_level)
    }
}

impl<W: io::Write + Send> LogSink for WriterSink<W> {
    fn log(&self, level: Level, message: &str) {
        if level < self.min_level {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        // a broken log writer must not fail the query
        let _ = writeln!(writer, "[{timestamp}] [{level}] {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_filters_by_level() {
        let sink = MemorySink::new(Level::Warn);
        sink.debug("dropped");
        sink.warn("kept");
        sink.fatal("also kept");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(sink.contains(Level::Warn, "kept"));
        assert!(sink.contains(Level::Fatal, "also"));

        sink.clear();
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_writer_sink_format() {
        let sink = WriterSink::new(Vec::new(), Level::Info);
        sink.debug("hidden");
        sink.info("API url set to http://localhost");

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with('['));
        assert!(out.contains("] [INFO] API url set to http://localhost"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Fatal);
        assert_eq!(Level::Warn.to_string(), "WARN");
    }
}
