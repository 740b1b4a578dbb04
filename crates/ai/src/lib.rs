//! `recipe-ai`
//!
//! **Responsibility:** language model boundary.
//!
//! - It knows nothing about HTTP routing or the event bus.
//! - It turns recipe text into a prompt, calls a model, and parses the reply.
//! - Model access sits behind [`LlmClient`] so callers and tests can swap it.

pub mod client;
pub mod processor;
pub mod prompt;
pub mod result;

pub use client::{LlmClient, OllamaClient, OllamaConfig};
pub use processor::RecipeProcessor;
pub use prompt::build_recipe_prompt;
pub use result::{AiError, ProcessedRecipe, parse_processed_recipe};
