//! Event bus error model.

use thiserror::Error;

/// Why a publish was rejected.
///
/// Returned synchronously to the producer; the event was not enqueued and the
/// caller may retry or surface a transient failure.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The caller's cancellation token fired before the event was enqueued.
    #[error("publish cancelled by caller")]
    Cancelled,

    /// The bus is shutting down or has been stopped.
    #[error("event bus stopped")]
    Stopped,

    /// `start` has not been called yet.
    #[error("event bus not started")]
    NotStarted,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartError {
    #[error("event bus already started")]
    AlreadyStarted,

    #[error("event bus has been stopped and cannot be restarted")]
    Stopped,

    /// Workers are tokio tasks; `start` must run inside a runtime.
    #[error("no tokio runtime available to spawn workers")]
    NoRuntime,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StopError {
    #[error("{count} event bus worker(s) terminated abnormally")]
    WorkerPanicked { count: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid event bus config: {0}")]
    Invalid(String),
}
