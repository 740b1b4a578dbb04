//! Discriminator → ordered handler list.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::handler::SharedHandler;

/// Thread-safe handler registry.
///
/// Registration appends; lookup returns a snapshot so callers never hold the
/// lock while a handler runs. A registration that races with a dispatch is
/// visible to events looked up after it, never to one already in flight.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Vec<SharedHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` under `event_type`; returns how many handlers that
    /// type now has.
    pub fn register(&self, event_type: impl Into<String>, handler: SharedHandler) -> usize {
        // A poisoned lock only means a writer panicked mid-push; the map itself is intact.
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let list = handlers.entry(event_type.into()).or_default();
        list.push(handler);
        list.len()
    }

    /// Snapshot of the handlers for `event_type`, in registration order.
    pub fn lookup(&self, event_type: &str) -> Vec<SharedHandler> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(event_type).cloned().unwrap_or_default()
    }

    pub fn handler_count(&self, event_type: &str) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(event_type).map_or(0, Vec::len)
    }

    /// Every discriminator with at least one handler (unordered).
    pub fn event_types(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.keys().cloned().collect()
    }
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for (event_type, list) in handlers.iter() {
            map.entry(event_type, &list.len());
        }
        map.finish()
    }
}
