//! Liveness endpoint.

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::api::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health - Service status and whether the calendar agent is usable.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "agent_available": state.briefing.is_some(),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}
