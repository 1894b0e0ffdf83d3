#![forbid(unsafe_code)]

//! Spectrum demo library: a scripted sample application.
//!
//! Exposes the CLI parser and the storyboard so tests can drive them.

pub mod cli;
pub mod scenario;
