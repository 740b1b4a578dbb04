//! Worker loop and per-event dispatch.
//!
//! ```text
//! Waiting ──dequeue──▶ Processing ──dispatch done──▶ Waiting
//!    │
//!    └── queue closed & drained, or lifecycle cancelled while idle ──▶ Exited
//! ```
//!
//! Each handler runs under a child token of the lifecycle token and a deadline.
//! On timeout the child is cancelled and the handler future is dropped.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_channel::Receiver;
use futures::FutureExt;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::event::SharedEvent;
use crate::handler::{EventHandler, HandlerContext, HandlerError, HandlerResult};
use crate::registry::HandlerRegistry;
use crate::stats::BusCounters;

/// What happened to one dequeued event.
#[derive(Debug)]
pub(crate) enum DispatchOutcome {
    /// No handler was registered for the event's type.
    Unhandled,
    /// One result per handler, in invocation order.
    Handled(Vec<HandlerResult>),
}

/// Shared by every worker of one bus.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    counters: Arc<BusCounters>,
    handler_timeout: Duration,
    lifecycle: CancellationToken,
}

impl Dispatcher {
    pub(crate) fn new(
        registry: Arc<HandlerRegistry>,
        counters: Arc<BusCounters>,
        handler_timeout: Duration,
        lifecycle: CancellationToken,
    ) -> Self {
        Self {
            registry,
            counters,
            handler_timeout,
            lifecycle,
        }
    }

    /// Run every handler registered for the event's type, in order.
    pub(crate) async fn dispatch(&self, event: SharedEvent) -> DispatchOutcome {
        let event_type = event.event_type();
        let handlers = self.registry.lookup(event_type);

        if handlers.is_empty() {
            warn!(event_type, "no handlers registered for event");
            self.counters.unhandled();
            return DispatchOutcome::Unhandled;
        }

        self.counters.dispatched();
        let mut results = Vec::with_capacity(handlers.len());

        for (handler_index, handler) in handlers.iter().enumerate() {
            let started = Instant::now();
            let result = self.invoke(handler.as_ref(), &event).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => {
                    self.counters.succeeded();
                    debug!(event_type, handler_index, duration_ms, "handler succeeded");
                }
                Err(e) => {
                    self.counters.failed(e.is_timeout());
                    error!(event_type, handler_index, duration_ms, error = %e, "handler failed");
                }
            }

            results.push(result);
        }

        DispatchOutcome::Handled(results)
    }

    async fn invoke(&self, handler: &dyn EventHandler, event: &SharedEvent) -> HandlerResult {
        let token = self.lifecycle.child_token();
        let deadline = Instant::now() + self.handler_timeout;
        let ctx = HandlerContext::new(token.clone(), deadline);

        // `handle` itself runs inside the guarded future so a panic while
        // building the handler future is contained too.
        let call = AssertUnwindSafe(async { handler.handle(ctx, event.clone()).await }).catch_unwind();

        let result = match time::timeout_at(deadline, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(HandlerError::Panicked(panic_message(panic.as_ref()))),
            Err(_elapsed) => Err(HandlerError::Timeout {
                timeout: self.handler_timeout,
            }),
        };

        token.cancel();
        result
    }
}

/// Drain `queue` until it is closed and empty, or the lifecycle token fires
/// while there is nothing left to take.
pub(crate) async fn run_worker(worker_id: usize, queue: Receiver<SharedEvent>, dispatcher: Dispatcher) {
    debug!(worker_id, "worker started");

    loop {
        let event = tokio::select! {
            // Dequeue wins over cancellation so queued events are still drained.
            biased;
            received = queue.recv() => match received {
                Ok(event) => event,
                Err(_closed) => {
                    debug!(worker_id, "worker stopped");
                    return;
                }
            },
            () = dispatcher.lifecycle.cancelled() => {
                debug!(worker_id, "worker cancelled");
                return;
            }
        };

        dispatcher.dispatch(event).await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
