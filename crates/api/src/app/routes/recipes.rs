use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, warn};

use crate::app::services::AppServices;
use crate::app::submit::SubmitRecipeCommand;
use crate::app::{dto, errors};

/// `POST /api/v1/recipes`: accept a recipe for asynchronous processing.
pub async fn submit_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SubmitRecipeRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "invalid request body");
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                "Invalid request body",
                Some(rejection.body_text()),
            );
        }
    };

    // Cancelled if the client goes away or the server shuts down mid-publish.
    let ctx = services.request_token();
    let _guard = ctx.clone().drop_guard();

    let cmd = SubmitRecipeCommand {
        recipe_text: body.recipe_text,
    };

    match services.submit().execute(&ctx, cmd).await {
        Ok(result) => (
            StatusCode::ACCEPTED,
            Json(dto::SubmitRecipeResponse {
                recipe_id: result.recipe_id.to_string(),
                message: "Recipe submitted for processing".to_string(),
            }),
        )
            .into_response(),
        Err(e) => errors::submit_error_to_response(e),
    }
}

/// `POST /api/v1/recipes/process`: run the language model synchronously.
pub async fn process_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ProcessRecipeRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "invalid request body");
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "Invalid request format",
                Some(rejection.body_text()),
            );
        }
    };

    if let Err(msg) = body.validate() {
        warn!(error = %msg, "request validation failed");
        return errors::json_error(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", "Validation failed", Some(msg));
    }

    match services.processor().process(&body.recipe).await {
        Ok(recipe) => (
            StatusCode::OK,
            Json(dto::ProcessRecipeResponse {
                success: true,
                message: "Recipe processed successfully".to_string(),
                recipe: Some(recipe),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to process recipe");
            errors::ai_error_to_response(e)
        }
    }
}
