use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Structured access log: one record per request, written after the response.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or_default().to_string();

    let response = next.run(req).await;

    info!(
        method = %method,
        path,
        query,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "http request"
    );
    response
}

/// Any origin may call the API; preflights are answered by the layer.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Requests running past `limit` are answered with `408 Request Timeout`.
pub fn timeout(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::new(limit)
}
