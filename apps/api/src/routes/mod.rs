pub mod health;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::evaluation::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and the date field on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/evaluations", post(handlers::handle_submit))
        .route(
            "/api/v1/evaluations/normalize",
            post(handlers::handle_normalize),
        )
        .route("/api/v1/evaluations/latest", get(handlers::handle_latest))
        .route(
            "/api/v1/evaluations/latest/report",
            get(handlers::handle_latest_report),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Response for a handler that panicked. The connection stays open and the
/// caller gets the usual error body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": {
                "code": "INTERNAL_ERROR",
                "message": "Something went wrong while processing the request. Please try again."
            }
        })),
    )
        .into_response()
}
