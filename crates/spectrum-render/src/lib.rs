#![forbid(unsafe_code)]

//! Report text for Spectrum.
//!
//! - [`report::ReportRenderer`] walks a composite tree and writes framed
//!   hierarchy lines plus pending [`changes::ChangeLog`] entries.
//! - [`chunker::OutputChunker`] packs those lines into bounded messages.
//! - [`sink::LogSink`] implementations deliver the messages.

pub mod changes;
pub mod chunker;
pub mod glyphs;
pub mod report;
pub mod sink;

pub use changes::ChangeLog;
pub use chunker::{DEFAULT_MAX_MESSAGE_BYTES, OutputChunker};
pub use glyphs::GlyphSet;
pub use report::ReportRenderer;
pub use sink::{LogSink, MemorySink, Severity, SinkRecord, TracingSink, WriterSink};
