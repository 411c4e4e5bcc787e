//! Meeting briefing endpoints.
//!
//! - GET /meetings/:date - briefings for every meeting found on a date
//! - GET /meeting/:id    - briefing for one meeting
//! - GET /next-meeting   - briefing for the next upcoming meeting

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::briefing::MeetingBriefing;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/meetings/:date", get(meetings_for_date))
        .route("/meeting/:id", get(meeting_details))
        .route("/next-meeting", get(next_meeting))
        .with_state(state)
}

async fn meetings_for_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Json<Value>> {
    let briefing = state
        .briefing_agent()
        .map_err(ApiError::with_empty_meetings)?;

    info!("Briefing request for {}", date);
    let meetings = briefing.briefings_for_date(&date).await.map_err(|e| {
        error!("Error processing date {}: {:#}", date, e);
        ApiError::from(e).with_empty_meetings()
    })?;

    Ok(Json(json!({
        "date": date,
        "count": meetings.len(),
        "meetings": meetings,
    })))
}

async fn meeting_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MeetingBriefing>> {
    let briefing = state.briefing_agent()?;

    let details = briefing.meeting_details(&id).await.map_err(|e| {
        error!("Error getting meeting details for {}: {:#}", id, e);
        ApiError::from(e)
    })?;

    details
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Meeting not found"))
}

async fn next_meeting(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let briefing = state.briefing_agent()?;

    let next = briefing.next_meeting_briefing().await.map_err(|e| {
        error!("Error getting next meeting: {:#}", e);
        ApiError::from(e)
    })?;

    Ok(Json(match next {
        Some(meeting) => json!({ "meeting": meeting }),
        None => json!({
            "message": "No upcoming meetings found",
            "meeting": null,
        }),
    }))
}
