use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use recipe_ai::AiError;
use recipe_core::DomainError;

use crate::app::submit::SubmitError;

pub fn submit_error_to_response(err: SubmitError) -> axum::response::Response {
    match err {
        SubmitError::Validation(e @ DomainError::RecipeTextEmpty) => json_error(
            StatusCode::BAD_REQUEST,
            "EMPTY_TEXT",
            "Recipe text validation failed",
            Some(e.to_string()),
        ),
        SubmitError::Validation(e @ DomainError::RecipeTextTooLong { .. }) => json_error(
            StatusCode::BAD_REQUEST,
            "TEXT_TOO_LONG",
            "Recipe text validation failed",
            Some(e.to_string()),
        ),
        SubmitError::Validation(e) => json_error(
            StatusCode::BAD_REQUEST,
            "INVALID_REQUEST",
            "Recipe text validation failed",
            Some(e.to_string()),
        ),
        SubmitError::Publish(e) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "EVENT_BUS_UNAVAILABLE",
            "Recipe could not be queued for processing",
            Some(e.to_string()),
        ),
    }
}

pub fn ai_error_to_response(err: AiError) -> axum::response::Response {
    match err {
        AiError::InvalidInput(msg) => json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "Recipe validation failed",
            Some(msg),
        ),
        other => json_error(
            StatusCode::BAD_GATEWAY,
            "LLM_FAILED",
            "Failed to process recipe",
            Some(other.to_string()),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    error: impl Into<String>,
    details: Option<String>,
) -> axum::response::Response {
    let mut body = json!({
        "error": error.into(),
        "code": code,
    });
    if let Some(details) = details {
        body["details"] = json!(details);
    }

    (status, axum::Json(body)).into_response()
}
