use axum::{routing::post, Router};

pub mod recipes;
pub mod system;

/// Router for the versioned API (mounted under `/api/v1`).
pub fn router() -> Router {
    Router::new()
        .route("/recipes", post(recipes::submit_recipe))
        .route("/recipes/process", post(recipes::process_recipe))
}
