#![forbid(unsafe_code)]

//! Lifecycle and layout signals fed to the engine.

use spectrum_core::{ActivityId, FragmentId, FragmentTransition, LifecycleState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// An activity entered a lifecycle state.
    Activity {
        activity: ActivityId,
        state: LifecycleState,
    },
    /// A fragment was attached to or detached from its host.
    Fragment {
        fragment: FragmentId,
        transition: FragmentTransition,
    },
    /// Some tracked window finished a layout pass.
    LayoutChanged,
}

impl UiEvent {
    #[must_use]
    pub fn activity(activity: ActivityId, state: LifecycleState) -> Self {
        Self::Activity { activity, state }
    }

    #[must_use]
    pub fn attached(fragment: FragmentId, parent: impl Into<String>) -> Self {
        Self::Fragment {
            fragment,
            transition: FragmentTransition::Attached {
                parent: parent.into(),
            },
        }
    }

    #[must_use]
    pub fn detached(fragment: FragmentId) -> Self {
        Self::Fragment {
            fragment,
            transition: FragmentTransition::Detached,
        }
    }
}
