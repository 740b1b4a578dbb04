//! Event handlers and the context they run under.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::event::SharedEvent;

/// Outcome of one handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Failure of a single handler invocation for a single event.
///
/// Handler errors are never propagated to the publisher. The bus logs and
/// counts them, then moves on to the next handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler reported a failure.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The handler observed cancellation and gave up.
    #[error("handler cancelled")]
    Cancelled,

    /// The handler did not finish before its deadline and was abandoned.
    #[error("handler timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The handler panicked; the panic was contained by the worker.
    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Cancellation scope handed to a handler for one invocation.
///
/// The token is a child of the bus lifecycle token: it fires when the bus is
/// torn down or when the handler's own deadline passes. Cancellation is
/// cooperative; a handler that never polls it is abandoned at the deadline.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    token: CancellationToken,
    deadline: Instant,
}

impl HandlerContext {
    pub fn new(token: CancellationToken, deadline: Instant) -> Self {
        Self { token, deadline }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the invocation has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the bus abandons this invocation.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Callback invoked once per matching event.
pub trait EventHandler: Send + Sync + 'static {
    fn handle(&self, ctx: HandlerContext, event: SharedEvent) -> BoxFuture<'static, HandlerResult>;
}

/// Handlers are shared between the registry and every worker.
pub type SharedHandler = Arc<dyn EventHandler>;

struct FnHandler<F>(F);

impl<F, Fut> EventHandler for FnHandler<F>
where
    F: Fn(HandlerContext, SharedEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, ctx: HandlerContext, event: SharedEvent) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.0)(ctx, event))
    }
}

/// Wrap an async closure as a [`SharedHandler`].
///
/// ```ignore
/// bus.subscribe("recipe.submitted", handler_fn(|_ctx, event| async move {
///     tracing::info!(event_type = event.event_type(), "got it");
///     Ok(())
/// }));
/// ```
pub fn handler_fn<F, Fut>(f: F) -> SharedHandler
where
    F: Fn(HandlerContext, SharedEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn context_reports_cancellation_and_deadline() {
        let token = CancellationToken::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        let ctx = HandlerContext::new(token.child_token(), deadline);

        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.deadline(), deadline);
        assert!(ctx.remaining() <= Duration::from_secs(5));

        token.cancel();
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn timeout_is_a_handler_failure() {
        let err = HandlerError::Timeout {
            timeout: Duration::from_millis(50),
        };
        assert!(err.is_timeout());
        assert!(!HandlerError::failed("boom").is_timeout());
        assert_eq!(HandlerError::failed("boom").to_string(), "handler failed: boom");
    }
}
