//! Free-form questions answered by the ReAct agent.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub query: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ask", post(ask)).with_state(state)
}

/// POST /ask - Run the agent on `query`. Agent failures are part of the answer.
async fn ask(
    State(state): State<AppState>,
    body: Option<Json<AskRequest>>,
) -> ApiResult<Json<Value>> {
    let agent = state.agent.clone().ok_or_else(ApiError::agent_unavailable)?;

    let query = body
        .and_then(|Json(req)| req.query)
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query is required"))?;

    info!("Agent question: {}", query);
    let answer = agent.run(&query).await;

    Ok(Json(json!({
        "query": query,
        "answer": answer,
    })))
}
