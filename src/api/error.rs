//! API error handling for consistent JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const AGENT_UNAVAILABLE: &str = "Calendar agent not available";

/// API error type that converts to `{"error": "<message>"}` responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    /// Listing endpoints also return an empty `meetings` array on failure.
    empty_meetings: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            empty_meetings: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn agent_unavailable() -> Self {
        Self::internal(AGENT_UNAVAILABLE)
    }

    pub fn with_empty_meetings(mut self) -> Self {
        self.empty_meetings = true;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = if self.empty_meetings {
            json!({ "error": self.message, "meetings": [] })
        } else {
            json!({ "error": self.message })
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{:#}", err))
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_anyhow_conversion_keeps_cause_chain() {
        let err = Err::<(), _>(anyhow!("Calendar access token expired"))
            .context("Failed to fetch next meeting")
            .unwrap_err();
        let api_error = ApiError::from(err);
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            api_error.message,
            "Failed to fetch next meeting: Calendar access token expired"
        );
    }
}
