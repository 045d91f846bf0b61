use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{actions, agents, health, logs};
use crate::state::AppState;

fn panic_handler(_err: Box<dyn std::any::Any + Send>) -> axum::response::Response {
    let body = serde_json::json!({ "error": "internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Builds the full marketplace HTTP surface: agent registration and lookup,
/// action execution and protocol discovery, log ingestion, and health.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/agents/register", post(agents::register))
        .route("/agents", get(agents::list))
        .route("/agents/{id}", get(agents::get_by_id))
        .route("/actions/execute", post(actions::execute))
        .route("/actions/protocol", get(actions::protocol))
        .route("/logs/create", post(logs::create))
        .route("/logs", get(logs::list))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_handler as fn(_) -> _))
        .with_state(state)
}
