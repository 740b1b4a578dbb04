//! In-process event bus backed by a bounded queue and a fixed worker pool.

use std::mem;
use std::sync::{Arc, Mutex, PoisonError};

use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::bus::EventBus;
use crate::config::EventBusConfig;
use crate::error::{ConfigError, PublishError, StartError, StopError};
use crate::event::SharedEvent;
use crate::handler::SharedHandler;
use crate::registry::HandlerRegistry;
use crate::stats::{BusCounters, BusStats};
use crate::worker::{Dispatcher, run_worker};

enum Lifecycle {
    Created,
    Running {
        token: CancellationToken,
        workers: Vec<JoinHandle<()>>,
    },
    Stopped,
}

/// In-memory event bus.
///
/// - Bounded FIFO queue shared by `worker_count` tokio tasks
/// - Handlers run sequentially per event, each under its own deadline
/// - `stop` is a graceful drain: everything enqueued before it is dispatched
/// - At-most-once, fire-and-forget delivery
pub struct InMemoryEventBus {
    config: EventBusConfig,
    registry: Arc<HandlerRegistry>,
    counters: Arc<BusCounters>,
    sender: Sender<SharedEvent>,
    receiver: Receiver<SharedEvent>,
    lifecycle: Mutex<Lifecycle>,
    span: Span,
}

impl InMemoryEventBus {
    /// Bus with the default configuration (10 workers, 100 slots, 30s timeout).
    pub fn new() -> Self {
        Self::build(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Log every bus record (including worker spans) under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn build(config: EventBusConfig) -> Self {
        let (sender, receiver) = async_channel::bounded(config.queue_capacity);
        Self {
            config,
            registry: Arc::new(HandlerRegistry::new()),
            counters: Arc::new(BusCounters::default()),
            sender,
            receiver,
            lifecycle: Mutex::new(Lifecycle::Created),
            span: info_span!("event_bus"),
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn stats(&self) -> BusStats {
        self.counters.snapshot()
    }

    /// Events enqueued but not yet taken by a worker.
    pub fn queue_len(&self) -> usize {
        self.receiver.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.config.queue_capacity
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_lifecycle(), Lifecycle::Running { .. })
    }

    fn lock_lifecycle(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn running_token(&self) -> Result<CancellationToken, PublishError> {
        match &*self.lock_lifecycle() {
            Lifecycle::Created => Err(PublishError::NotStarted),
            Lifecycle::Running { token, .. } => Ok(token.clone()),
            Lifecycle::Stopped => Err(PublishError::Stopped),
        }
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for InMemoryEventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("queue_len", &self.queue_len())
            .field("running", &self.is_running())
            .finish()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, ctx: &CancellationToken, event: SharedEvent) -> Result<(), PublishError> {
        if ctx.is_cancelled() {
            return Err(PublishError::Cancelled);
        }
        let lifecycle = self.running_token()?;
        let event_type = event.event_type().to_string();

        let sent = tokio::select! {
            biased;
            () = ctx.cancelled() => Err(PublishError::Cancelled),
            () = lifecycle.cancelled() => Err(PublishError::Stopped),
            // A closed queue means `stop` is in progress.
            sent = self.sender.send(event) => sent.map_err(|_closed| PublishError::Stopped),
        };

        if sent.is_ok() {
            self.counters.published();
            self.span.in_scope(|| debug!(event_type = %event_type, "event published"));
        }
        sent
    }

    fn subscribe(&self, event_type: &str, handler: SharedHandler) {
        let total_handlers = self.registry.register(event_type, handler);
        self.span
            .in_scope(|| info!(event_type, total_handlers, "handler subscribed"));
    }

    fn start(&self, parent: &CancellationToken) -> Result<(), StartError> {
        let runtime = Handle::try_current().map_err(|_| StartError::NoRuntime)?;
        let mut lifecycle = self.lock_lifecycle();

        match &*lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Running { .. } => return Err(StartError::AlreadyStarted),
            Lifecycle::Stopped => return Err(StartError::Stopped),
        }

        let token = parent.child_token();
        let dispatcher = Dispatcher::new(
            self.registry.clone(),
            self.counters.clone(),
            self.config.handler_timeout,
            token.clone(),
        );

        let workers = (0..self.config.worker_count)
            .map(|worker_id| {
                let span = info_span!(parent: &self.span, "event_bus_worker", worker_id);
                runtime.spawn(
                    run_worker(worker_id, self.receiver.clone(), dispatcher.clone()).instrument(span),
                )
            })
            .collect();

        *lifecycle = Lifecycle::Running { token, workers };

        self.span.in_scope(|| {
            info!(
                workers = self.config.worker_count,
                buffer_size = self.config.queue_capacity,
                "event bus started"
            );
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), StopError> {
        let previous = mem::replace(&mut *self.lock_lifecycle(), Lifecycle::Stopped);
        self.sender.close();

        let (token, workers) = match previous {
            Lifecycle::Running { token, workers } => (token, workers),
            Lifecycle::Created => {
                self.span.in_scope(|| info!("event bus stopped before it was started"));
                return Ok(());
            }
            Lifecycle::Stopped => {
                self.span.in_scope(|| debug!("event bus already stopped"));
                return Ok(());
            }
        };

        // Workers exit once the closed queue is drained.
        let mut abnormal = 0;
        for worker in workers {
            if let Err(e) = worker.await {
                self.span.in_scope(|| warn!(error = %e, "event bus worker terminated abnormally"));
                abnormal += 1;
            }
        }
        token.cancel();

        let stats = self.counters.snapshot();
        self.span.in_scope(|| {
            info!(
                events_published = stats.events_published,
                events_dispatched = stats.events_dispatched,
                handlers_failed = stats.handlers_failed,
                "event bus stopped"
            );
        });

        if abnormal > 0 {
            return Err(StopError::WorkerPanicked { count: abnormal });
        }
        Ok(())
    }
}
