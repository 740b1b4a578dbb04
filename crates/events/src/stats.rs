//! Bus runtime statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time snapshot of bus activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    pub events_published: u64,
    pub events_dispatched: u64,
    /// Dequeued events whose type had no handlers.
    pub events_unhandled: u64,
    pub handlers_succeeded: u64,
    /// Includes timeouts and panics.
    pub handlers_failed: u64,
    pub handlers_timed_out: u64,
}

#[derive(Debug, Default)]
pub(crate) struct BusCounters {
    events_published: AtomicU64,
    events_dispatched: AtomicU64,
    events_unhandled: AtomicU64,
    handlers_succeeded: AtomicU64,
    handlers_failed: AtomicU64,
    handlers_timed_out: AtomicU64,
}

impl BusCounters {
    pub(crate) fn published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unhandled(&self) {
        self.events_unhandled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn succeeded(&self) {
        self.handlers_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failed(&self, timed_out: bool) {
        self.handlers_failed.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.handlers_timed_out.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> BusStats {
        BusStats {
            events_published: self.events_published.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_unhandled: self.events_unhandled.load(Ordering::Relaxed),
            handlers_succeeded: self.handlers_succeeded.load(Ordering::Relaxed),
            handlers_failed: self.handlers_failed.load(Ordering::Relaxed),
            handlers_timed_out: self.handlers_timed_out.load(Ordering::Relaxed),
        }
    }
}
