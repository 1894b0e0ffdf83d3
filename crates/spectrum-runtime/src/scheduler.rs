#![forbid(unsafe_code)]

//! Change accumulation and throttled report scheduling.
//!
//! Every detected change is appended to the pending [`ChangeLog`] (unless it
//! repeats the previous entry). Whether a report follows depends on the
//! policy:
//!
//! - auto reporting off: nothing is scheduled, changes wait for a manual
//!   report;
//! - throttle off: report immediately;
//! - throttle on: arm a single timer `window` from now unless one is already
//!   armed for a time not yet passed.
//!
//! The timer is one slot. Arming replaces whatever was there; it never
//! stacks.
//!
//! # Invariants
//!
//! - Within one throttle window at most one automatic report fires.
//! - `take_due(now)` disarms the timer when it fires.

use std::time::{Duration, Instant};

use spectrum_render::ChangeLog;

/// Scheduling knobs derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub auto_report: bool,
    pub throttle: bool,
    pub window: Duration,
}

/// What the caller should do after a change was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    /// Auto reporting is off; the change waits for a manual report.
    Deferred,
    /// Report now.
    ReportNow,
    /// A report was armed for the given instant.
    Scheduled(Instant),
    /// A report is already armed for the given instant.
    Pending(Instant),
}

#[derive(Debug, Default)]
pub struct ChangeScheduler {
    changes: ChangeLog,
    deadline: Option<Instant>,
}

impl ChangeScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change with the current time.
    pub fn on_change(&mut self, description: impl Into<String>, policy: SchedulePolicy) -> ScheduleAction {
        self.on_change_at(description, policy, Instant::now())
    }

    /// Record a change observed at `now`.
    pub fn on_change_at(
        &mut self,
        description: impl Into<String>,
        policy: SchedulePolicy,
        now: Instant,
    ) -> ScheduleAction {
        let recorded = self.changes.push(description);

        let action = if !policy.auto_report {
            ScheduleAction::Deferred
        } else if !policy.throttle {
            ScheduleAction::ReportNow
        } else {
            match self.deadline {
                Some(deadline) if deadline >= now => ScheduleAction::Pending(deadline),
                _ => {
                    let deadline = now + policy.window;
                    self.deadline = Some(deadline);
                    ScheduleAction::Scheduled(deadline)
                }
            }
        };
        tracing::trace!(recorded, pending = self.changes.len(), ?action, "change detected");
        action
    }

    /// Whether the armed timer has expired at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Disarm and return `true` if the timer has expired at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Disarm the timer without reporting.
    pub fn cancel(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            tracing::trace!(?deadline, "scheduled report cancelled");
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    pub fn changes_mut(&mut self) -> &mut ChangeLog {
        &mut self.changes
    }

    /// Forget pending changes and the timer.
    pub fn reset(&mut self) {
        self.changes.clear();
        self.deadline = None;
    }
}
