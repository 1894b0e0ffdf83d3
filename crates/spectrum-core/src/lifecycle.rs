#![forbid(unsafe_code)]

//! Lifecycle vocabulary shared by the event feed and the report.

use std::fmt;

/// Lifecycle state of an activity.
///
/// The event feed delivers transitions with the same names: an activity that
/// receives `Resumed` is in state `Resumed` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// `onCreate` completed.
    Created,
    /// Visible but not interactive.
    Started,
    /// In the foreground.
    Resumed,
    /// Losing focus.
    Paused,
    /// No longer visible.
    Stopped,
    /// Gone; tracking ends.
    Destroyed,
}

impl LifecycleState {
    /// All states in transition order.
    pub const ALL: [Self; 6] = [
        Self::Created,
        Self::Started,
        Self::Resumed,
        Self::Paused,
        Self::Stopped,
        Self::Destroyed,
    ];

    /// Label used in reports and change descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Resumed => "resumed",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Destroyed => "destroyed",
        }
    }

    /// Parse a label (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Whether this state ends tracking.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment transition of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTransition {
    /// Attached to a host; the label names the parent fragment or activity.
    Attached {
        /// Human-readable name of the parent the fragment attached to.
        parent: String,
    },
    /// Detached from its host.
    Detached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parse() {
        for state in LifecycleState::ALL {
            assert_eq!(LifecycleState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(
            LifecycleState::parse(" Resumed "),
            Some(LifecycleState::Resumed)
        );
        assert_eq!(LifecycleState::parse("restarted"), None);
    }

    #[test]
    fn only_destroyed_is_terminal() {
        let terminal: Vec<_> = LifecycleState::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![LifecycleState::Destroyed]);
    }
}
