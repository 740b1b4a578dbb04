use serde::{Deserialize, Serialize};

use recipe_ai::ProcessedRecipe;

/// Bounds (in characters) for the synchronous processing endpoint.
pub const PROCESS_RECIPE_MIN_CHARS: usize = 10;
pub const PROCESS_RECIPE_MAX_CHARS: usize = 50_000;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SubmitRecipeRequest {
    pub recipe_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessRecipeRequest {
    pub recipe: String,
}

impl ProcessRecipeRequest {
    pub fn validate(&self) -> Result<(), String> {
        let chars = self.recipe.chars().count();
        if chars < PROCESS_RECIPE_MIN_CHARS {
            return Err(format!(
                "recipe must be at least {PROCESS_RECIPE_MIN_CHARS} characters (got {chars})"
            ));
        }
        if chars > PROCESS_RECIPE_MAX_CHARS {
            return Err(format!(
                "recipe must be at most {PROCESS_RECIPE_MAX_CHARS} characters (got {chars})"
            ));
        }
        Ok(())
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SubmitRecipeResponse {
    pub recipe_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessRecipeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<ProcessedRecipe>,
}
