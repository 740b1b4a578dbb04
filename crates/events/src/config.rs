//! Event bus configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Default number of worker tasks draining the queue.
pub const DEFAULT_WORKER_COUNT: usize = 10;
/// Default capacity of the bounded event queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
/// Default upper bound on a single handler invocation.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// In-memory event bus configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Number of concurrent workers.
    pub worker_count: usize,
    /// Bounded queue capacity; publishers wait when it is full.
    pub queue_capacity: usize,
    /// Deadline applied to each handler invocation.
    pub handler_timeout: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }
}

impl EventBusConfig {
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("worker_count must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be at least 1".to_string()));
        }
        if self.handler_timeout.is_zero() {
            return Err(ConfigError::Invalid("handler_timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}
