use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **open-ended** (new kinds are new types; the bus never changes)
/// - shared read-only between the producer and every handler
pub trait Event: AsAny + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "recipe.submitted").
    ///
    /// This is the discriminator the handler registry is keyed by.
    fn event_type(&self) -> &str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// An event as it travels through the bus.
pub type SharedEvent = Arc<dyn Event>;

/// Type-erasure helper so handlers can recover the concrete event type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Event {
    /// Borrow the event as its concrete type, if it is one.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    pub fn is<E: Event>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }
}
