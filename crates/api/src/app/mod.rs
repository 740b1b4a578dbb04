//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared state handed to every route (use cases, processor)
//! - `submit.rs`: the submit-recipe use case (validate, mint id, publish)
//! - `subscribers.rs`: event handlers subscribed to the bus at startup
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod submit;
pub mod subscribers;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<services::AppServices>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", routes::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(middleware::cors())
                .layer(middleware::timeout(request_timeout)),
        )
}
