//! Domain events emitted by the recipe use cases.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_events::Event;

use crate::id::RecipeId;
use crate::recipe::RecipeText;

/// Discriminator of [`RecipeSubmitted`].
pub const RECIPE_SUBMITTED: &str = "recipe.submitted";

/// A recipe passed validation and was accepted for asynchronous processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSubmitted {
    recipe_id: RecipeId,
    recipe_text: RecipeText,
    occurred_at: DateTime<Utc>,
}

impl RecipeSubmitted {
    pub fn new(recipe_id: RecipeId, recipe_text: RecipeText) -> Self {
        Self {
            recipe_id,
            recipe_text,
            occurred_at: Utc::now(),
        }
    }

    pub fn recipe_id(&self) -> RecipeId {
        self.recipe_id
    }

    pub fn recipe_text(&self) -> &RecipeText {
        &self.recipe_text
    }
}

impl Event for RecipeSubmitted {
    fn event_type(&self) -> &str {
        RECIPE_SUBMITTED
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
