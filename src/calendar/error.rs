//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar access token is not configured")]
    AuthRequired,

    #[error("Calendar access token expired")]
    TokenExpired,

    #[error("Calendar rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    #[error("Calendar API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
