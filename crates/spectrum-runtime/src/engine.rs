#![forbid(unsafe_code)]

//! The report engine.
//!
//! [`ReportEngine`] owns everything that lives between reports: the tracked
//! activities, the pending changes and throttle timer, the node pools, and
//! the sink. It is bound to the thread that created it; other threads talk
//! to it through a [`ReportHandle`].
//!
//! # Report flow
//!
//! 1. Tracked activities that no longer resolve are dropped.
//! 2. The composite tree is built ([`TreeMerger`]).
//! 3. Lookup warnings go to the sink at `Warn`.
//! 4. The tree and pending changes are rendered and chunked; each message
//!    goes to the sink at the configured level and tag.
//! 5. Pending changes are cleared and the tree returns to the pools.
//!
//! # Usage
//!
//! ```
//! use spectrum_core::sim::{ClassSpec, SimulatedUi};
//! use spectrum_core::LifecycleState;
//! use spectrum_render::{MemorySink, Severity};
//! use spectrum_runtime::{ReportEngine, SpectrumConfig};
//!
//! let mut ui = SimulatedUi::new();
//! let window = ui.add_activity(ClassSpec::kotlin("com.acme.MainActivity"));
//! ui.set_state(window.activity, LifecycleState::Resumed);
//!
//! let sink = MemorySink::new();
//! let config = SpectrumConfig::default().with_enabled(true).with_throttle(false);
//! let mut engine = ReportEngine::new(config, sink.clone());
//! engine.explore(&ui, window.activity).unwrap();
//!
//! let text = sink.text_at(Severity::Debug);
//! assert!(text.contains("⬟[Activity] .(MainActivity.kt:0) [resumed]"));
//! ```

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use spectrum_core::graph::UiGraph;
use spectrum_core::{ActivityId, FragmentId, FragmentTransition, LifecycleState, NodeRef};
use spectrum_render::{LogSink, OutputChunker, ReportRenderer, Severity, TracingSink};
use spectrum_tree::{NodeStore, StoreStats, TrackedActivity, TreeMerger};

use crate::config::{Configure, SpectrumConfig};
use crate::dispatch::{Dispatch, Dispatcher, ReportHandle};
use crate::error::ExploreError;
use crate::event::UiEvent;
use crate::scheduler::{ChangeScheduler, ScheduleAction};

/// Change description for a layout pass.
pub const LAYOUT_CHANGED: &str = "layout changed";

/// Counters of one emitted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub activities: usize,
    pub lines: usize,
    pub messages: usize,
    pub warnings: usize,
    pub build_time: Duration,
}

/// Builds and emits reports for tracked activities.
pub struct ReportEngine {
    config: SpectrumConfig,
    sink: Box<dyn LogSink>,
    tracked: Vec<TrackedActivity>,
    explore_application: bool,
    scheduler: ChangeScheduler,
    merger: TreeMerger,
    store: NodeStore,
    renderer: ReportRenderer,
    dispatcher: Dispatcher,
    reports: u64,
    // Pins the engine to its creating thread.
    _ui_thread: PhantomData<*const ()>,
}

impl std::fmt::Debug for ReportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportEngine")
            .field("config", &self.config)
            .field("tracked", &self.tracked)
            .field("explore_application", &self.explore_application)
            .field("pending", &self.scheduler.changes().len())
            .field("deadline", &self.scheduler.deadline())
            .field("reports", &self.reports)
            .finish_non_exhaustive()
    }
}

impl ReportEngine {
    pub fn new(config: SpectrumConfig, sink: impl LogSink + 'static) -> Self {
        let renderer = ReportRenderer::new(config.glyphs);
        Self {
            config,
            sink: Box::new(sink),
            tracked: Vec::new(),
            explore_application: false,
            scheduler: ChangeScheduler::new(),
            merger: TreeMerger::new(),
            store: NodeStore::new(),
            renderer,
            dispatcher: Dispatcher::new(),
            reports: 0,
            _ui_thread: PhantomData,
        }
    }

    /// Engine that reports through `tracing` events.
    pub fn with_tracing(config: SpectrumConfig) -> Self {
        Self::new(config, TracingSink)
    }

    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Edit the live configuration; takes effect from the next change or
    /// report.
    pub fn configure(&mut self) -> Configure<'_> {
        Configure::new(&mut self.config)
    }

    /// A `Send` handle for requesting reports from other threads.
    pub fn report_handle(&self) -> ReportHandle {
        self.dispatcher.handle()
    }

    /// Start tracking an activity.
    ///
    /// Tracking an already tracked activity does nothing. An activity
    /// without a lifecycle is reported to the sink as a warning and not
    /// tracked.
    pub fn explore<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        activity: ActivityId,
    ) -> Result<(), ExploreError> {
        self.explore_at(graph, activity, Instant::now())
    }

    pub fn explore_at<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        activity: ActivityId,
        now: Instant,
    ) -> Result<(), ExploreError> {
        if !self.config.enabled || self.is_tracked(activity) {
            return Ok(());
        }
        let Some(info) = graph.type_info(NodeRef::Activity(activity)) else {
            let err = ExploreError::Gone(activity);
            self.warn(&err.to_string());
            return Err(err);
        };
        let Some(state) = graph.lifecycle_state(activity) else {
            let err = ExploreError::MissingLifecycle {
                activity,
                name: info.qualified_name(),
            };
            self.warn(&err.to_string());
            return Err(err);
        };

        self.tracked.push(TrackedActivity {
            id: activity,
            state,
        });
        tracing::debug!(activity = activity.get(), %state, "activity explored");
        let description = format!("{} {state}", info.link(self.config.append_package_names));
        self.notify_change_at(graph, description, now);
        Ok(())
    }

    /// Explore every activity that reports `created` from now on.
    pub fn explore_application(&mut self) {
        if self.config.enabled {
            self.explore_application = true;
        }
    }

    pub fn is_tracked(&self, activity: ActivityId) -> bool {
        self.tracked.iter().any(|t| t.id == activity)
    }

    pub fn tracked(&self) -> &[TrackedActivity] {
        &self.tracked
    }

    /// Feed a lifecycle or layout signal observed now.
    pub fn on_event<G: UiGraph + ?Sized>(&mut self, graph: &G, event: UiEvent) {
        self.on_event_at(graph, event, Instant::now());
    }

    pub fn on_event_at<G: UiGraph + ?Sized>(&mut self, graph: &G, event: UiEvent, now: Instant) {
        if !self.config.enabled {
            return;
        }
        match event {
            UiEvent::Activity { activity, state } => self.on_activity(graph, activity, state, now),
            UiEvent::Fragment {
                fragment,
                transition,
            } => self.on_fragment(graph, fragment, transition, now),
            UiEvent::LayoutChanged => {
                if !self.tracked.is_empty() {
                    self.notify_change_at(graph, LAYOUT_CHANGED, now);
                }
            }
        }
    }

    fn on_activity<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        activity: ActivityId,
        state: LifecycleState,
        now: Instant,
    ) {
        let Some(index) = self.tracked.iter().position(|t| t.id == activity) else {
            if self.explore_application && state == LifecycleState::Created {
                // Failures were already reported to the sink.
                let _ = self.explore_at(graph, activity, now);
            } else {
                tracing::trace!(activity = activity.get(), %state, "event for untracked activity");
            }
            return;
        };

        if state.is_terminal() {
            self.tracked.remove(index);
        } else {
            self.tracked[index].state = state;
        }
        let link = self.link(graph, NodeRef::Activity(activity));
        self.notify_change_at(graph, format!("{link} {state}"), now);
    }

    fn on_fragment<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        fragment: FragmentId,
        transition: FragmentTransition,
        now: Instant,
    ) {
        if self.tracked.is_empty() {
            return;
        }
        let link = self.link(graph, NodeRef::Fragment(fragment));
        let description = match transition {
            FragmentTransition::Attached { parent } => format!("{link} attached to {parent}"),
            FragmentTransition::Detached => format!("{link} detached"),
        };
        self.notify_change_at(graph, description, now);
    }

    fn link<G: UiGraph + ?Sized>(&self, graph: &G, node: NodeRef) -> String {
        match graph.type_info(node) {
            Some(info) => info.link(self.config.append_package_names),
            None => match node {
                NodeRef::Activity(id) => id.to_string(),
                NodeRef::View(id) => id.to_string(),
                NodeRef::Fragment(id) => id.to_string(),
            },
        }
    }

    /// Record a change and report according to the scheduling policy.
    pub fn notify_change<G: UiGraph + ?Sized>(&mut self, graph: &G, description: impl Into<String>) {
        self.notify_change_at(graph, description, Instant::now());
    }

    pub fn notify_change_at<G: UiGraph + ?Sized>(
        &mut self,
        graph: &G,
        description: impl Into<String>,
        now: Instant,
    ) {
        if !self.config.enabled {
            return;
        }
        // An expired timer owes its report before the window restarts.
        if self.scheduler.take_due(now) {
            self.report(graph);
        }
        let policy = self.config.schedule_policy();
        if self.scheduler.on_change_at(description, policy, now) == ScheduleAction::ReportNow {
            self.report(graph);
        }
    }

    /// Changes recorded since the last report.
    pub fn pending_changes(&self) -> &[String] {
        self.scheduler.changes().entries()
    }

    /// When the armed throttle timer fires, if armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Build and emit a report now.
    ///
    /// Returns `None` when the engine is disabled.
    pub fn report<G: UiGraph + ?Sized>(&mut self, graph: &G) -> Option<ReportSummary> {
        if !self.config.enabled {
            return None;
        }
        debug_assert!(
            self.dispatcher.is_owner_thread(),
            "report engine used off its UI thread"
        );

        let started = Instant::now();
        self.prune(graph);
        let tree = self.merger.build(
            graph,
            &self.tracked,
            self.config.build_options(),
            &mut self.store,
        );
        let build_time = started.elapsed();
        let activities = self.store.tree(tree).activities.len();

        let warnings = self.merger.take_warnings();
        for warning in &warnings {
            self.sink.print(Severity::Warn, &self.config.log_tag, warning);
        }

        self.renderer.set_glyphs(self.config.glyphs);
        let mut chunker = OutputChunker::new(self.config.max_message_bytes);
        let lines = self.renderer.render(
            &self.store,
            tree,
            self.scheduler.changes_mut(),
            build_time,
            &mut chunker,
        );
        self.store.release_tree(tree);

        let messages = chunker.build();
        for message in &messages {
            self.sink
                .print(self.config.log_level, &self.config.log_tag, message);
        }
        self.reports += 1;

        let summary = ReportSummary {
            activities,
            lines,
            messages: messages.len(),
            warnings: warnings.len(),
            build_time,
        };
        tracing::debug!(
            activities,
            lines,
            messages = summary.messages,
            warnings = summary.warnings,
            build_us = u64::try_from(build_time.as_micros()).unwrap_or(u64::MAX),
            "report emitted"
        );
        Some(summary)
    }

    /// Drop tracked activities that no longer resolve in the graph.
    fn prune<G: UiGraph + ?Sized>(&mut self, graph: &G) {
        self.tracked.retain(|t| {
            let alive = graph.type_info(NodeRef::Activity(t.id)).is_some();
            if !alive {
                tracing::debug!(activity = t.id.get(), "collected activity pruned");
            }
            alive
        });
    }

    /// Run queued requests and the throttle timer.
    ///
    /// Returns the number of reports emitted.
    pub fn pump<G: UiGraph + ?Sized>(&mut self, graph: &G) -> usize {
        self.pump_at(graph, Instant::now())
    }

    pub fn pump_at<G: UiGraph + ?Sized>(&mut self, graph: &G, now: Instant) -> usize {
        if !self.config.enabled {
            // Keep the queue from growing while disabled.
            self.dispatcher.drain().for_each(drop);
            return 0;
        }
        let before = self.reports;
        let mut redirected = false;
        let queued: Vec<Dispatch> = self.dispatcher.drain().collect();
        for request in queued {
            match request {
                Dispatch::Report => redirected = true,
                Dispatch::Change(description) => self.notify_change_at(graph, description, now),
            }
        }
        if redirected {
            self.scheduler.cancel();
            self.report(graph);
        }
        if self.scheduler.take_due(now) {
            self.report(graph);
        }
        usize::try_from(self.reports - before).unwrap_or(usize::MAX)
    }

    /// Reports emitted since creation or the last reset.
    pub fn reports_emitted(&self) -> u64 {
        self.reports
    }

    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Forget all tracking, changes, the timer, and pooled records.
    pub fn reset(&mut self) {
        self.tracked.clear();
        self.explore_application = false;
        self.scheduler.reset();
        self.store.clear();
        self.dispatcher.drain().for_each(drop);
        self.reports = 0;
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!(tag = %self.config.log_tag, "{message}");
        self.sink.print(Severity::Warn, &self.config.log_tag, message);
    }
}
