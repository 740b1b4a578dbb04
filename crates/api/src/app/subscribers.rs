//! Bus subscribers wired at startup.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{info, warn};

use recipe_ai::RecipeProcessor;
use recipe_core::{RECIPE_SUBMITTED, RecipeSubmitted};
use recipe_events::{EventBus, EventHandler, HandlerContext, HandlerError, HandlerResult, SharedEvent};

/// Runs the language model over every accepted submission.
#[derive(Debug, Clone)]
pub struct RecipeSubmittedHandler {
    processor: RecipeProcessor,
}

impl RecipeSubmittedHandler {
    pub fn new(processor: RecipeProcessor) -> Self {
        Self { processor }
    }
}

impl EventHandler for RecipeSubmittedHandler {
    fn handle(&self, ctx: HandlerContext, event: SharedEvent) -> BoxFuture<'static, HandlerResult> {
        let processor = self.processor.clone();

        Box::pin(async move {
            let Some(submitted) = event.downcast_ref::<RecipeSubmitted>() else {
                return Err(HandlerError::failed(format!(
                    "expected {RECIPE_SUBMITTED}, got {}",
                    event.event_type()
                )));
            };
            let recipe_id = submitted.recipe_id();
            let text = submitted.recipe_text().value().to_string();

            info!(%recipe_id, "processing submitted recipe");

            tokio::select! {
                () = ctx.cancelled() => {
                    warn!(%recipe_id, "recipe processing cancelled");
                    Err(HandlerError::Cancelled)
                }
                processed = processor.process(&text) => {
                    let processed = processed.map_err(|e| HandlerError::failed(e.to_string()))?;
                    info!(%recipe_id, title = %processed.title, "submitted recipe processed");
                    Ok(())
                }
            }
        })
    }
}

/// Subscribe every application handler to `bus`.
pub fn register(bus: &dyn EventBus, processor: RecipeProcessor) {
    bus.subscribe(RECIPE_SUBMITTED, Arc::new(RecipeSubmittedHandler::new(processor)));
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use recipe_ai::{AiError, LlmClient};
    use recipe_core::{RecipeId, RecipeText};
    use recipe_events::{CancellationToken, Event};
    use tokio::time::Instant;

    use super::*;

    struct ScriptedLlm {
        reply: Result<String, AiError>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            *self.calls.lock().unwrap() += 1;
            self.reply.clone()
        }
    }

    struct NeverAnswers;

    #[async_trait]
    impl LlmClient for NeverAnswers {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            std::future::pending().await
        }
    }

    #[derive(Debug)]
    struct Unrelated;

    impl Event for Unrelated {
        fn event_type(&self) -> &str {
            "unrelated"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    fn ctx(token: &CancellationToken) -> HandlerContext {
        HandlerContext::new(token.child_token(), Instant::now() + Duration::from_secs(5))
    }

    fn submitted() -> SharedEvent {
        let text = RecipeText::new("2 eggs, salt, butter").unwrap();
        Arc::new(RecipeSubmitted::new(RecipeId::new(), text))
    }

    #[tokio::test]
    async fn processes_submitted_recipe() {
        let llm = Arc::new(ScriptedLlm {
            reply: Ok(r#"{"title": "Roerei"}"#.to_string()),
            calls: Mutex::new(0),
        });
        let handler = RecipeSubmittedHandler::new(RecipeProcessor::new(llm.clone()));

        let result = handler.handle(ctx(&CancellationToken::new()), submitted()).await;

        assert!(result.is_ok());
        assert_eq!(*llm.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn model_failure_becomes_handler_failure() {
        let llm = Arc::new(ScriptedLlm {
            reply: Err(AiError::Transport("connection refused".to_string())),
            calls: Mutex::new(0),
        });
        let handler = RecipeSubmittedHandler::new(RecipeProcessor::new(llm));

        let result = handler.handle(ctx(&CancellationToken::new()), submitted()).await;

        match result {
            Err(HandlerError::Failed(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn gives_up_when_context_is_cancelled() {
        let handler = RecipeSubmittedHandler::new(RecipeProcessor::new(Arc::new(NeverAnswers)));
        let parent = CancellationToken::new();
        let call = handler.handle(ctx(&parent), submitted());

        parent.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), call).await.unwrap();

        assert!(matches!(result, Err(HandlerError::Cancelled)));
    }

    #[tokio::test]
    async fn rejects_foreign_events() {
        let llm = Arc::new(ScriptedLlm {
            reply: Ok("{}".to_string()),
            calls: Mutex::new(0),
        });
        let handler = RecipeSubmittedHandler::new(RecipeProcessor::new(llm.clone()));

        let result = handler.handle(ctx(&CancellationToken::new()), Arc::new(Unrelated)).await;

        assert!(matches!(result, Err(HandlerError::Failed(_))));
        assert_eq!(*llm.calls.lock().unwrap(), 0);
    }
}
