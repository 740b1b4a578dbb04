use std::sync::Arc;

use recipe_ai::{LlmClient, RecipeProcessor};
use recipe_events::{CancellationToken, EventBus};

use crate::app::submit::SubmitRecipeService;
use crate::app::subscribers;

/// Shared state handed to every route through an `Extension`.
#[derive(Debug, Clone)]
pub struct AppServices {
    submit: SubmitRecipeService,
    processor: RecipeProcessor,
    shutdown: CancellationToken,
}

impl AppServices {
    /// Wire the use cases and subscribe the bus handlers.
    ///
    /// `shutdown` is the server-wide token; request contexts derive from it.
    pub fn new(bus: Arc<dyn EventBus>, llm: Arc<dyn LlmClient>, shutdown: CancellationToken) -> Self {
        let processor = RecipeProcessor::new(llm);
        subscribers::register(bus.as_ref(), processor.clone());

        Self {
            submit: SubmitRecipeService::new(bus),
            processor,
            shutdown,
        }
    }

    pub fn submit(&self) -> &SubmitRecipeService {
        &self.submit
    }

    pub fn processor(&self) -> &RecipeProcessor {
        &self.processor
    }

    /// Cancellation scope for one request.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
