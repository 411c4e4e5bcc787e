//! Keyword search endpoint.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub keyword: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search-meetings", post(search_meetings))
        .with_state(state)
}

/// POST /search-meetings - Briefings for up to five meetings matching a keyword.
async fn search_meetings(
    State(state): State<AppState>,
    body: Option<Json<SearchRequest>>,
) -> ApiResult<Json<Value>> {
    let briefing = state.briefing_agent()?;

    let keyword = body
        .and_then(|Json(req)| req.keyword)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::bad_request("Keyword is required"))?;

    let meetings = briefing.search_briefings(&keyword).await.map_err(|e| {
        error!("Error searching meetings: {:#}", e);
        ApiError::from(e)
    })?;

    Ok(Json(json!({
        "keyword": keyword,
        "count": meetings.len(),
        "meetings": meetings,
    })))
}
