#![forbid(unsafe_code)]

//! Spectrum runtime: configuration, change scheduling, cross-thread report
//! requests, and the [`ReportEngine`] that ties tree building, rendering and
//! delivery together.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod event;
pub mod scheduler;

pub use config::{ConfigError, ConfigParse, Configure, SpectrumConfig};
pub use dispatch::{Dispatch, ReportHandle};
pub use engine::{LAYOUT_CHANGED, ReportEngine, ReportSummary};
pub use error::ExploreError;
pub use event::UiEvent;
pub use scheduler::{ChangeScheduler, SchedulePolicy, ScheduleAction};
