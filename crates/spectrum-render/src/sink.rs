#![forbid(unsafe_code)]

//! Destinations for report messages.
//!
//! A [`LogSink`] receives every chunked message of a report, plus warnings,
//! tagged with a [`Severity`] and the configured log tag.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Message priority, numbered like the platform log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Verbose = 2,
    #[default]
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Assert = 7,
}

impl Severity {
    pub const ALL: [Self; 6] = [
        Self::Verbose,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Assert,
    ];

    #[must_use]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_priority(priority: u8) -> Option<Self> {
        match priority {
            2 => Some(Self::Verbose),
            3 => Some(Self::Debug),
            4 => Some(Self::Info),
            5 => Some(Self::Warn),
            6 => Some(Self::Error),
            7 => Some(Self::Assert),
            _ => None,
        }
    }

    /// Single-letter form used in log prefixes.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Verbose => 'V',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
            Self::Assert => 'A',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Assert => "assert",
        }
    }

    /// Parse a name (`debug`, `W`, `warning`) or a numeric priority (`2..=7`).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(priority) = value.parse::<u8>() {
            return Self::from_priority(priority);
        }
        let lower = value.to_ascii_lowercase();
        match lower.as_str() {
            "warning" => Some(Self::Warn),
            other => Self::ALL.into_iter().find(|s| {
                s.as_str() == other
                    || (other.len() == 1 && other.starts_with(s.letter().to_ascii_lowercase()))
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of report messages.
pub trait LogSink {
    fn print(&mut self, severity: Severity, tag: &str, message: &str);
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn print(&mut self, severity: Severity, tag: &str, message: &str) {
        (**self).print(severity, tag, message);
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn print(&mut self, severity: Severity, tag: &str, message: &str) {
        (**self).print(severity, tag, message);
    }
}

/// Forwards messages as `tracing` events with target `spectrum`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn print(&mut self, severity: Severity, tag: &str, message: &str) {
        match severity {
            Severity::Verbose => tracing::trace!(target: "spectrum", tag, "{message}"),
            Severity::Debug => tracing::debug!(target: "spectrum", tag, "{message}"),
            Severity::Info => tracing::info!(target: "spectrum", tag, "{message}"),
            Severity::Warn => tracing::warn!(target: "spectrum", tag, "{message}"),
            Severity::Error | Severity::Assert => {
                tracing::error!(target: "spectrum", tag, "{message}");
            }
        }
    }
}

/// Writes logcat-style lines (`D/Spectrum: text`) to any writer.
///
/// Multi-line messages get the prefix on every line. The first write error
/// is kept and further output is dropped.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl WriterSink<io::Stderr> {
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl WriterSink<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_message(&mut self, severity: Severity, tag: &str, message: &str) -> io::Result<()> {
        let letter = severity.letter();
        for line in message.lines() {
            writeln!(self.writer, "{letter}/{tag}: {line}")?;
        }
        self.writer.flush()
    }
}

impl<W: Write> LogSink for WriterSink<W> {
    fn print(&mut self, severity: Severity, tag: &str, message: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_message(severity, tag, message) {
            tracing::warn!(%err, "report sink write failed");
            self.error = Some(err);
        }
    }
}

/// One message captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkRecord {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
}

/// Keeps every message in memory.
///
/// Clones share the same buffer, so a test can hand one clone to an engine
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<SinkRecord>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages at `severity`, in order.
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.severity == severity)
            .map(|r| r.message.clone())
            .collect()
    }

    /// Concatenation of all messages at `severity`.
    pub fn text_at(&self, severity: Severity) -> String {
        self.messages_at(severity).concat()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl LogSink for MemorySink {
    fn print(&mut self, severity: Severity, tag: &str, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SinkRecord {
                severity,
                tag: tag.to_owned(),
                message: message.to_owned(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_names_letters_and_numbers() {
        assert_eq!(Severity::parse("debug"), Some(Severity::Debug));
        assert_eq!(Severity::parse("W"), Some(Severity::Warn));
        assert_eq!(Severity::parse("Warning"), Some(Severity::Warn));
        assert_eq!(Severity::parse("6"), Some(Severity::Error));
        assert_eq!(Severity::parse("9"), None);
        assert_eq!(Severity::parse("loud"), None);
    }

    #[test]
    fn priorities_round_trip() {
        for s in Severity::ALL {
            assert_eq!(Severity::from_priority(s.priority()), Some(s));
        }
    }

    #[test]
    fn writer_sink_prefixes_every_line() {
        let mut sink = WriterSink::new(Vec::new());
        sink.print(Severity::Debug, "Spectrum", "HIERARCHY:\n⬟[Activity] .(A.kt:0)\n");
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "D/Spectrum: HIERARCHY:\nD/Spectrum: ⬟[Activity] .(A.kt:0)\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_keeps_first_error() {
        let mut sink = WriterSink::new(Broken);
        sink.print(Severity::Warn, "Spectrum", "one");
        sink.print(Severity::Warn, "Spectrum", "two");
        let err = sink.take_error().expect("error recorded");
        assert_eq!(err.to_string(), "closed");
        assert!(sink.take_error().is_none());
    }

    #[test]
    fn memory_sink_clones_share_records() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.print(Severity::Debug, "Spectrum", "a\n");
        writer.print(Severity::Warn, "Spectrum", "w");
        writer.print(Severity::Debug, "Spectrum", "b\n");
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.text_at(Severity::Debug), "a\nb\n");
        assert_eq!(sink.messages_at(Severity::Warn), vec!["w"]);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn boxed_sink_forwards() {
        let sink = MemorySink::new();
        let mut boxed: Box<dyn LogSink> = Box::new(sink.clone());
        boxed.print(Severity::Info, "T", "m");
        assert_eq!(sink.records()[0].tag, "T");
    }
}
