//! Recipe text value object.

use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Longest recipe text accepted for asynchronous processing, in bytes.
pub const MAX_RECIPE_TEXT_LENGTH: usize = 10_000;

/// Validated, whitespace-trimmed recipe text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecipeText(String);

impl RecipeText {
    pub fn new(text: impl AsRef<str>) -> DomainResult<Self> {
        let text = text.as_ref().trim();

        if text.is_empty() {
            return Err(DomainError::RecipeTextEmpty);
        }
        if text.len() > MAX_RECIPE_TEXT_LENGTH {
            return Err(DomainError::RecipeTextTooLong {
                max: MAX_RECIPE_TEXT_LENGTH,
                actual: text.len(),
            });
        }

        Ok(Self(text.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for RecipeText {}

impl AsRef<str> for RecipeText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RecipeText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(RecipeText::new("   \n\t "), Err(DomainError::RecipeTextEmpty));
        assert_eq!(RecipeText::new(""), Err(DomainError::RecipeTextEmpty));
    }

    #[test]
    fn one_byte_over_the_limit_is_rejected() {
        let long = "a".repeat(MAX_RECIPE_TEXT_LENGTH + 1);
        assert_eq!(
            RecipeText::new(&long),
            Err(DomainError::RecipeTextTooLong {
                max: MAX_RECIPE_TEXT_LENGTH,
                actual: MAX_RECIPE_TEXT_LENGTH + 1,
            })
        );
        assert!(RecipeText::new("a".repeat(MAX_RECIPE_TEXT_LENGTH)).is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let text = RecipeText::new("  Pancakes with syrup  ").unwrap();
        assert_eq!(text.value(), "Pancakes with syrup");
        assert_eq!(text.to_string(), "Pancakes with syrup");
        assert_eq!(text, RecipeText::new("Pancakes with syrup").unwrap());
    }

    #[test]
    fn limit_applies_after_trimming() {
        let padded = format!("   {}   ", "b".repeat(MAX_RECIPE_TEXT_LENGTH));
        assert_eq!(RecipeText::new(padded).unwrap().len(), MAX_RECIPE_TEXT_LENGTH);
    }

    proptest! {
        #[test]
        fn accepted_text_is_trimmed_non_empty_and_bounded(s in "\\PC{0,200}") {
            match RecipeText::new(&s) {
                Ok(text) => {
                    prop_assert!(!text.is_empty());
                    prop_assert!(text.len() <= MAX_RECIPE_TEXT_LENGTH);
                    prop_assert_eq!(text.value(), s.trim());
                }
                Err(e) => prop_assert_eq!(e, DomainError::RecipeTextEmpty),
            }
        }
    }
}
