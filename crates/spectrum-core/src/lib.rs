#![forbid(unsafe_code)]

//! Core: identities, lifecycle vocabulary, geometry, and the read-only UI
//! graph accessor.
//!
//! Nothing in this crate owns toolkit objects. Activities, views, and
//! fragments are named by opaque identities and inspected through
//! [`graph::UiGraph`]. [`sim::SimulatedUi`] is an in-memory implementation
//! used by tests and the demo.

pub mod geometry;
pub mod graph;
pub mod identity;
pub mod lifecycle;
pub mod logging;
pub mod sim;

pub use geometry::Rect;
pub use graph::{LookupError, UiGraph, ViewParent, Visibility};
pub use identity::{ActivityId, FragmentHost, FragmentId, NodeRef, SourceLanguage, TypeInfo, ViewId};
pub use lifecycle::{FragmentTransition, LifecycleState};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
