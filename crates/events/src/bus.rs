//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern** - a pub/sub mechanism that
//! decouples the code that accepts work (HTTP handlers, use cases) from the code
//! that performs it (handlers subscribed by event type).
//!
//! ## Delivery Model
//!
//! - **At-most-once**: an accepted event is dispatched once; failed handlers are
//!   not retried and the event is not requeued
//! - **Fire-and-forget**: `publish` succeeds as soon as the event is enqueued;
//!   handler outcomes never reach the publisher
//! - **No persistence**: queued events are lost if the process dies
//! - **Best-effort ordering**: FIFO within the queue, but concurrent workers mean
//!   no global delivery order across events
//!
//! Handlers for one event run sequentially in registration order. A failing,
//! panicking or stuck handler does not prevent its siblings from running.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{PublishError, StartError, StopError};
use crate::event::SharedEvent;
use crate::handler::SharedHandler;

/// Domain-agnostic event bus.
///
/// ## Lifecycle
///
/// ```text
/// Created ──start──▶ Running ──stop──▶ Stopped
/// ```
///
/// - `subscribe` is valid in every state (typically during wiring, before `start`)
/// - `publish` only succeeds while Running
/// - `stop` drains everything already enqueued before returning
///
/// ## Cancellation
///
/// `publish` takes the caller's cancellation token. Cancelling it only affects
/// that publish attempt, never the bus. The bus's own lifecycle token is derived
/// from the token passed to `start`.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`; every method may be called concurrently.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Enqueue `event` for asynchronous dispatch.
    ///
    /// Waits for queue room if the queue is full, until `ctx` is cancelled
    /// ([`PublishError::Cancelled`]) or the bus shuts down
    /// ([`PublishError::Stopped`]).
    async fn publish(&self, ctx: &CancellationToken, event: SharedEvent) -> Result<(), PublishError>;

    /// Append `handler` to the handlers of `event_type`.
    fn subscribe(&self, event_type: &str, handler: SharedHandler);

    /// Launch the worker pool; the lifecycle token is a child of `parent`.
    fn start(&self, parent: &CancellationToken) -> Result<(), StartError>;

    /// Reject new publishes, drain the queue, and wait for every worker to exit.
    async fn stop(&self) -> Result<(), StopError>;
}

#[async_trait]
impl<B> EventBus for Arc<B>
where
    B: EventBus + ?Sized,
{
    async fn publish(&self, ctx: &CancellationToken, event: SharedEvent) -> Result<(), PublishError> {
        (**self).publish(ctx, event).await
    }

    fn subscribe(&self, event_type: &str, handler: SharedHandler) {
        (**self).subscribe(event_type, handler);
    }

    fn start(&self, parent: &CancellationToken) -> Result<(), StartError> {
        (**self).start(parent)
    }

    async fn stop(&self) -> Result<(), StopError> {
        (**self).stop().await
    }
}
