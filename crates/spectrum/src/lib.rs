#![forbid(unsafe_code)]

//! Spectrum public facade crate.
//!
//! Re-exports the types needed to track activities, feed lifecycle signals,
//! and emit hierarchy reports, plus a prelude.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use spectrum_core::graph::{LookupError, UiGraph, ViewParent, Visibility};
pub use spectrum_core::identity::{
    ActivityId, FragmentHost, FragmentId, NodeRef, SourceLanguage, TypeInfo, ViewId,
};
pub use spectrum_core::lifecycle::{FragmentTransition, LifecycleState};
pub use spectrum_core::sim::{ClassSpec, SimWindow, SimulatedUi};
pub use spectrum_core::Rect;

// --- Render re-exports -----------------------------------------------------

pub use spectrum_render::{
    GlyphSet, LogSink, MemorySink, OutputChunker, ReportRenderer, Severity, TracingSink,
    WriterSink,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use spectrum_runtime::{
    ConfigError, ConfigParse, Configure, ExploreError, ReportEngine, ReportHandle, ReportSummary,
    SpectrumConfig, UiEvent,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Spectrum.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while writing reports.
    Io(std::io::Error),
    /// An identifier had no resource name.
    Lookup(LookupError),
    /// An activity could not be tracked.
    #[cfg(feature = "runtime")]
    Explore(ExploreError),
    /// Rejected configuration values.
    #[cfg(feature = "runtime")]
    Config(Vec<ConfigError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Lookup(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Explore(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Config(errors) => {
                f.write_str("invalid configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Lookup(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Explore(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Config(errors) => errors.first().map(|e| e as &(dyn std::error::Error + 'static)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

#[cfg(feature = "runtime")]
impl From<ExploreError> for Error {
    fn from(err: ExploreError) -> Self {
        Self::Explore(err)
    }
}

#[cfg(feature = "runtime")]
impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

/// Standard result type for Spectrum APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActivityId, Error, FragmentHost, FragmentId, LifecycleState, LogSink, Result, Severity,
        UiGraph, ViewId,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{ReportEngine, ReportHandle, SpectrumConfig, UiEvent};

    pub use crate::{core, render, tree};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use spectrum_core as core;
pub use spectrum_render as render;
#[cfg(feature = "runtime")]
pub use spectrum_runtime as runtime;
pub use spectrum_tree as tree;
