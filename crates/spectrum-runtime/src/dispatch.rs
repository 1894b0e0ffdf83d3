#![forbid(unsafe_code)]

//! Cross-thread requests to the UI context.
//!
//! The engine lives on one thread. Any other thread holds a [`ReportHandle`]
//! and queues requests that the engine drains on its next pump.

use std::sync::mpsc;
use std::thread::{self, ThreadId};

/// A request queued for the UI context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Build and emit a report.
    Report,
    /// Record a change description.
    Change(String),
}

/// Sender side held by other threads.
#[derive(Debug, Clone)]
pub struct ReportHandle {
    tx: mpsc::Sender<Dispatch>,
}

impl ReportHandle {
    /// Ask for a report on the next pump.
    ///
    /// Returns `false` once the engine is gone.
    pub fn report(&self) -> bool {
        self.tx.send(Dispatch::Report).is_ok()
    }

    /// Queue a change description.
    pub fn notify_change(&self, description: impl Into<String>) -> bool {
        self.tx.send(Dispatch::Change(description.into())).is_ok()
    }
}

/// Receiver side owned by the engine.
#[derive(Debug)]
pub(crate) struct Dispatcher {
    owner: ThreadId,
    tx: mpsc::Sender<Dispatch>,
    rx: mpsc::Receiver<Dispatch>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            owner: thread::current().id(),
            tx,
            rx,
        }
    }

    pub(crate) fn handle(&self) -> ReportHandle {
        ReportHandle {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Queued requests, without blocking.
    pub(crate) fn drain(&self) -> mpsc::TryIter<'_, Dispatch> {
        self.rx.try_iter()
    }
}
