//! Submit-recipe use case.
//!
//! Validates the text, mints a [`RecipeId`], and publishes a
//! [`RecipeSubmitted`] event. Processing happens later on the bus; the caller
//! only learns whether the event was accepted.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use recipe_core::{DomainError, RecipeId, RecipeSubmitted, RecipeText};
use recipe_events::{CancellationToken, EventBus, PublishError};

#[derive(Debug, Clone)]
pub struct SubmitRecipeCommand {
    pub recipe_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRecipeResult {
    pub recipe_id: RecipeId,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("recipe text validation failed: {0}")]
    Validation(#[from] DomainError),

    #[error("failed to publish event: {0}")]
    Publish(#[from] PublishError),
}

#[derive(Clone)]
pub struct SubmitRecipeService {
    bus: Arc<dyn EventBus>,
}

impl SubmitRecipeService {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    pub async fn execute(
        &self,
        ctx: &CancellationToken,
        cmd: SubmitRecipeCommand,
    ) -> Result<SubmitRecipeResult, SubmitError> {
        let recipe_text = RecipeText::new(&cmd.recipe_text)?;
        let text_length = recipe_text.len();

        let recipe_id = RecipeId::new();
        let event = RecipeSubmitted::new(recipe_id, recipe_text);

        if let Err(e) = self.bus.publish(ctx, Arc::new(event)).await {
            error!(%recipe_id, error = %e, "failed to publish recipe submitted event");
            return Err(e.into());
        }

        info!(%recipe_id, text_length, "recipe submitted");
        Ok(SubmitRecipeResult { recipe_id })
    }
}

impl core::fmt::Debug for SubmitRecipeService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubmitRecipeService").finish_non_exhaustive()
    }
}
