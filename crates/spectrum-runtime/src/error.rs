#![forbid(unsafe_code)]

use std::fmt;

use spectrum_core::ActivityId;

/// Why an activity could not be tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreError {
    /// The activity no longer exists in the graph.
    Gone(ActivityId),
    /// The activity exposes no lifecycle.
    MissingLifecycle { activity: ActivityId, name: String },
}

impl fmt::Display for ExploreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gone(activity) => write!(f, "{activity} no longer exists"),
            Self::MissingLifecycle { name, .. } => write!(
                f,
                "Activity {name} can't be explored because it does not expose a lifecycle"
            ),
        }
    }
}

impl std::error::Error for ExploreError {}
