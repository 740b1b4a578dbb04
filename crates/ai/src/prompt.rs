//! Prompt sent to the language model.

/// Build the extraction prompt for `recipe`.
///
/// The model is asked to answer with a single JSON object (and in Dutch);
/// [`crate::parse_processed_recipe`] tolerates prose around it.
pub fn build_recipe_prompt(recipe: &str) -> String {
    format!(
        r#"Please analyze the following recipe and extract structured information.
All texts returned to me must be in Dutch!

Respond with a single JSON object shaped like this:
{{
  "title": "Recipe title",
  "ingredients": ["ingredient 1", "ingredient 2"],
  "instructions": ["step 1", "step 2"],
  "total_time": "15",
  "servings": "4",
  "course_type": "main"
}}

Recipe data: {recipe}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_recipe_and_schema() {
        let prompt = build_recipe_prompt("2 eggs, whisk, fry");
        assert!(prompt.ends_with("Recipe data: 2 eggs, whisk, fry"));
        assert!(prompt.contains("\"ingredients\""));
        assert!(prompt.contains("Dutch"));
    }
}
