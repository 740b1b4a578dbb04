//! In-process event bus.
//!
//! Producers `publish` events into a bounded queue; a fixed pool of workers
//! drains it and runs the handlers subscribed to each event's type, every
//! handler under its own deadline.

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod in_memory_bus;
pub mod registry;
pub mod stats;

mod worker;

pub use bus::EventBus;
pub use config::{DEFAULT_HANDLER_TIMEOUT, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, EventBusConfig};
pub use error::{ConfigError, PublishError, StartError, StopError};
pub use event::{Event, SharedEvent};
pub use handler::{EventHandler, HandlerContext, HandlerError, HandlerResult, SharedHandler, handler_fn};
pub use in_memory_bus::InMemoryEventBus;
pub use registry::HandlerRegistry;
pub use stats::BusStats;

// Re-exported so callers can build publish/start tokens without a direct dependency.
pub use tokio_util::sync::CancellationToken;
