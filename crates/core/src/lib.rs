//! `recipe-core`: domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO): the validated
//! recipe text, identifiers, and the events the use cases emit.

pub mod error;
pub mod events;
pub mod id;
pub mod recipe;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use events::{RECIPE_SUBMITTED, RecipeSubmitted};
pub use id::RecipeId;
pub use recipe::{MAX_RECIPE_TEXT_LENGTH, RecipeText};
pub use value_object::ValueObject;
