#![forbid(unsafe_code)]

//! Composite tree for Spectrum reports.
//!
//! [`merge::TreeMerger`] captures tracked activities from a
//! [`spectrum_core::UiGraph`] into records owned by a [`store::NodeStore`].
//! Records come from free-list pools and go back to them once the report has
//! been rendered.

pub mod merge;
pub mod node;
pub mod pool;
pub mod store;

pub use merge::{BuildOptions, BuildStats, TrackedActivity, TreeMerger};
pub use node::{ActivityNode, CompositeTree, FragmentKind, FragmentNode, Placement, ViewNode};
pub use pool::{Handle, NodePool, PoolStats, Poolable};
pub use store::{NodeStore, StoreStats};
