use std::sync::Arc;

use tracing::{info, warn};

use crate::client::LlmClient;
use crate::prompt::build_recipe_prompt;
use crate::result::{AiError, ProcessedRecipe, parse_processed_recipe};

/// Turns free-form recipe text into a [`ProcessedRecipe`] via a language model.
#[derive(Clone)]
pub struct RecipeProcessor {
    llm: Arc<dyn LlmClient>,
}

impl RecipeProcessor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn process(&self, recipe: &str) -> Result<ProcessedRecipe, AiError> {
        if recipe.trim().is_empty() {
            return Err(AiError::InvalidInput("recipe text is empty".to_string()));
        }

        info!(length = recipe.len(), "processing recipe");

        let prompt = build_recipe_prompt(recipe);
        let raw = self.llm.generate(&prompt).await?;
        let processed = parse_processed_recipe(&raw).inspect_err(|e| {
            warn!(error = %e, "language model response could not be parsed");
        })?;

        info!(title = %processed.title, "recipe processed");
        Ok(processed)
    }
}

impl core::fmt::Debug for RecipeProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecipeProcessor").finish_non_exhaustive()
    }
}
