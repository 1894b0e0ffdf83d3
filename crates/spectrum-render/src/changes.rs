#![forbid(unsafe_code)]

//! Pending change descriptions.

/// Ordered change descriptions accumulated since the last report.
///
/// Consecutive duplicates collapse into one entry; the same description may
/// still appear twice when something else happened in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    entries: Vec<String>,
}

impl ChangeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a description unless it equals the most recent entry.
    ///
    /// Returns `true` when the entry was recorded.
    pub fn push(&mut self, description: impl Into<String>) -> bool {
        let description = description.into();
        if self.entries.last() == Some(&description) {
            return false;
        }
        self.entries.push(description);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
