//! Calendar access.
//!
//! [`CalendarSource`] is the seam the briefing layer and the agent tools talk
//! to; [`GoogleCalendar`] is the production implementation.

mod error;
mod google;
mod types;

pub use error::CalendarError;
pub use google::GoogleCalendar;
pub use types::{company_from_email, Attendee, AttendeeResearch, DayEvents, Meeting};

use async_trait::async_trait;
use chrono::NaiveDate;

/// Read-only meeting lookups.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Meetings whose title, description, location or attendees match `keyword`.
    async fn search(&self, keyword: &str, max_results: usize)
        -> Result<Vec<Meeting>, CalendarError>;

    /// A single meeting, or `None` if the calendar does not know the id.
    async fn meeting_by_id(&self, id: &str) -> Result<Option<Meeting>, CalendarError>;

    /// The next meeting that has not started yet.
    async fn next_meeting(&self) -> Result<Option<Meeting>, CalendarError>;

    async fn events_for_day(&self, date: NaiveDate) -> Result<DayEvents, CalendarError>;
}
