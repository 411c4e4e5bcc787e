//! Calendar tools the agent can call.
//!
//! Each tool takes one string input and answers with pretty-printed JSON or
//! a short sentence the model can read.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::calendar::{CalendarSource, Meeting};
use crate::research::prompts::truncate_chars;

const SEARCH_LIMIT: usize = 5;
const SEARCH_DESCRIPTION_CHARS: usize = 200;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn call(&self, input: &str) -> Result<String>;
}

/// The four calendar tools, in prompt order.
pub fn calendar_tools(calendar: Arc<dyn CalendarSource>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(NextMeetingTool {
            calendar: calendar.clone(),
        }),
        Box::new(MeetingsForDateTool {
            calendar: calendar.clone(),
        }),
        Box::new(SearchMeetingsTool {
            calendar: calendar.clone(),
        }),
        Box::new(MeetingByIdTool { calendar }),
    ]
}

fn iso(time: Option<chrono::DateTime<chrono::FixedOffset>>) -> Value {
    time.map(|t| Value::String(t.to_rfc3339()))
        .unwrap_or(Value::Null)
}

fn meeting_overview(meeting: &Meeting) -> Value {
    json!({
        "meeting_title": meeting.title,
        "person_names": meeting.person_names,
        "start_time": iso(meeting.start_time),
        "description": meeting.description,
    })
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub struct NextMeetingTool {
    calendar: Arc<dyn CalendarSource>,
}

#[async_trait]
impl Tool for NextMeetingTool {
    fn name(&self) -> &'static str {
        "get_next_meeting"
    }

    fn description(&self) -> &'static str {
        "Get information about the next upcoming meeting including title, attendees, and description"
    }

    async fn call(&self, _input: &str) -> Result<String> {
        match self.calendar.next_meeting().await? {
            Some(meeting) => pretty(&meeting_overview(&meeting)),
            None => Ok("No upcoming meetings found".to_string()),
        }
    }
}

pub struct MeetingsForDateTool {
    calendar: Arc<dyn CalendarSource>,
}

impl MeetingsForDateTool {
    async fn meetings_json(&self, date_str: &str) -> Result<Option<String>> {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
        let day = self.calendar.events_for_day(date).await?;
        if day.total_events == 0 {
            return Ok(None);
        }

        let results: Vec<Value> = day
            .meetings
            .iter()
            .map(|m| {
                json!({
                    "meeting_title": m.title,
                    "attendee_names": m.attendee_display_names(),
                    "start_time": iso(m.start_time),
                    "end_time": iso(m.end_time),
                    "description": m.description,
                    "location": m.location,
                    "organizer": m.organizer(),
                })
            })
            .collect();
        pretty(&Value::Array(results)).map(Some)
    }
}

#[async_trait]
impl Tool for MeetingsForDateTool {
    fn name(&self) -> &'static str {
        "get_meetings_for_date"
    }

    fn description(&self) -> &'static str {
        "Get all meetings for a specific date. Input should be in YYYY-MM-DD format. This is the PRIMARY tool to use when asked for meetings on a specific date."
    }

    async fn call(&self, input: &str) -> Result<String> {
        Ok(match self.meetings_json(input).await {
            Ok(Some(json)) => json,
            Ok(None) => format!("No meetings found for date: {}", input),
            Err(e) => format!("Error getting meetings for {}: {}", input, e),
        })
    }
}

pub struct SearchMeetingsTool {
    calendar: Arc<dyn CalendarSource>,
}

#[async_trait]
impl Tool for SearchMeetingsTool {
    fn name(&self) -> &'static str {
        "search_meetings"
    }

    fn description(&self) -> &'static str {
        "Search for meetings by keyword in title or description. Useful for finding specific types of meetings like 'interview', 'standup', 'review', etc."
    }

    async fn call(&self, input: &str) -> Result<String> {
        let meetings = self.calendar.search(input, SEARCH_LIMIT).await?;
        if meetings.is_empty() {
            return Ok(format!("No meetings found for keyword: {}", input));
        }

        let results: Vec<Value> = meetings
            .iter()
            .map(|m| {
                json!({
                    "meeting_title": m.title,
                    "person_names": m.person_names,
                    "start_time": iso(m.start_time),
                    "description": truncate_chars(&m.description, SEARCH_DESCRIPTION_CHARS),
                })
            })
            .collect();
        pretty(&Value::Array(results))
    }
}

pub struct MeetingByIdTool {
    calendar: Arc<dyn CalendarSource>,
}

#[async_trait]
impl Tool for MeetingByIdTool {
    fn name(&self) -> &'static str {
        "get_meeting_by_id"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about a specific meeting using its event ID"
    }

    async fn call(&self, input: &str) -> Result<String> {
        match self.calendar.meeting_by_id(input).await? {
            Some(meeting) => pretty(&meeting_overview(&meeting)),
            None => Ok(format!("Meeting not found for ID: {}", input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{meeting_at, FakeCalendar};

    #[tokio::test]
    async fn test_next_meeting_tool() {
        let mut meeting = meeting_at("n", "Interview: Jane Doe", "2025-09-24T16:00:00Z");
        meeting.description = "Backend loop".to_string();
        let tool = NextMeetingTool {
            calendar: Arc::new(FakeCalendar {
                next: Some(meeting),
                ..FakeCalendar::default()
            }),
        };

        let output = tool.call("").await.unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["meeting_title"], "Interview: Jane Doe");
        assert_eq!(value["person_names"][0], "Jane Doe");
        assert_eq!(value["start_time"], "2025-09-24T16:00:00+00:00");
        assert!(output.contains("\n  \"meeting_title\""));
    }

    #[tokio::test]
    async fn test_next_meeting_tool_empty() {
        let tool = NextMeetingTool {
            calendar: Arc::new(FakeCalendar::default()),
        };
        assert_eq!(tool.call("").await.unwrap(), "No upcoming meetings found");
    }

    #[tokio::test]
    async fn test_meetings_for_date_tool() {
        let mut meeting = meeting_at("a", "Planning", "2025-09-24T09:00:00Z");
        meeting.organizer_email = Some("boss@acme.io".to_string());
        let tool = MeetingsForDateTool {
            calendar: Arc::new(FakeCalendar {
                day: vec![meeting],
                ..FakeCalendar::default()
            }),
        };

        let value: Value = serde_json::from_str(&tool.call("2025-09-24").await.unwrap()).unwrap();
        assert_eq!(value[0]["meeting_title"], "Planning");
        assert_eq!(value[0]["attendee_names"][1], "Jane Doe");
        assert_eq!(value[0]["organizer"], "boss@acme.io");
        assert!(value[0]["end_time"].is_null());
    }

    #[tokio::test]
    async fn test_meetings_for_date_tool_messages() {
        let tool = MeetingsForDateTool {
            calendar: Arc::new(FakeCalendar::default()),
        };
        assert_eq!(
            tool.call("2025-09-24").await.unwrap(),
            "No meetings found for date: 2025-09-24"
        );
        assert!(tool
            .call("tomorrow")
            .await
            .unwrap()
            .starts_with("Error getting meetings for tomorrow: "));
    }

    #[tokio::test]
    async fn test_search_tool_truncates_description() {
        let mut meeting = meeting_at("a", "Standup", "2025-09-24T09:00:00Z");
        meeting.description = "x".repeat(250);
        let tool = SearchMeetingsTool {
            calendar: Arc::new(FakeCalendar::default().with("standup", vec![meeting])),
        };

        let value: Value = serde_json::from_str(&tool.call("standup").await.unwrap()).unwrap();
        let description = value[0]["description"].as_str().unwrap();
        assert_eq!(description.len(), 203);
        assert!(description.ends_with("..."));

        assert_eq!(
            tool.call("retro").await.unwrap(),
            "No meetings found for keyword: retro"
        );
    }

    #[tokio::test]
    async fn test_search_tool_propagates_calendar_errors() {
        let tool = SearchMeetingsTool {
            calendar: Arc::new(FakeCalendar::default().failing("standup")),
        };
        assert!(tool.call("standup").await.is_err());
    }

    #[tokio::test]
    async fn test_meeting_by_id_tool() {
        let tool = MeetingByIdTool {
            calendar: Arc::new(FakeCalendar::default().with(
                "sync",
                vec![meeting_at("evt9", "Sync", "2025-09-24T09:00:00Z")],
            )),
        };

        assert!(tool.call("evt9").await.unwrap().contains("\"Sync\""));
        assert_eq!(
            tool.call("missing").await.unwrap(),
            "Meeting not found for ID: missing"
        );
    }

    #[test]
    fn test_tool_order() {
        let tools = calendar_tools(Arc::new(FakeCalendar::default()));
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "get_next_meeting",
                "get_meetings_for_date",
                "search_meetings",
                "get_meeting_by_id"
            ]
        );
    }
}
