//! JSON payloads returned to the extension.

use serde::Serialize;

use crate::calendar::{AttendeeResearch, Meeting};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeBriefing {
    /// Calendar display name; null when the calendar has none.
    pub name: Option<String>,
    pub email: String,
    pub company: Option<String>,
    pub title: Option<String>,
    pub research_summary: String,
    pub found_info: bool,
}

impl From<&AttendeeResearch> for AttendeeBriefing {
    fn from(result: &AttendeeResearch) -> Self {
        Self {
            name: result.attendee.display_name.clone(),
            email: result.attendee.email.clone(),
            company: result.attendee.company.clone(),
            title: result.attendee.title.clone(),
            research_summary: result.research_summary.clone(),
            found_info: result.found_info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingBriefing {
    pub id: String,
    pub title: String,
    /// RFC 3339, or null when the calendar has no time.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub attendees: Vec<AttendeeBriefing>,
    pub research_summary: String,
    pub preparation_questions: String,
}

impl MeetingBriefing {
    /// Payload with attendee research filled in and analysis left empty.
    pub fn new(meeting: &Meeting, research: &[AttendeeResearch]) -> Self {
        Self {
            id: meeting.id.clone(),
            title: meeting.title.clone(),
            start_time: meeting.start_time.map(|t| t.to_rfc3339()),
            end_time: meeting.end_time.map(|t| t.to_rfc3339()),
            location: meeting.location.clone(),
            description: meeting.description.clone(),
            attendees: research.iter().map(AttendeeBriefing::from).collect(),
            research_summary: String::new(),
            preparation_questions: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Attendee;
    use chrono::DateTime;

    #[test]
    fn test_briefing_json_shape() {
        let mut meeting = Meeting::new("evt1", "Design review");
        meeting.start_time = DateTime::parse_from_rfc3339("2025-09-24T10:00:00+02:00").ok();
        meeting.description = "Review the API draft".to_string();

        let research = vec![AttendeeResearch {
            attendee: Attendee::new("jane@initech.com", Some("Jane Doe".to_string())),
            research_summary: "Principal engineer".to_string(),
            found_info: true,
        }];

        let briefing = MeetingBriefing::new(&meeting, &research);
        let json = serde_json::to_value(&briefing).unwrap();

        assert_eq!(json["id"], "evt1");
        assert_eq!(json["start_time"], "2025-09-24T10:00:00+02:00");
        assert!(json["end_time"].is_null());
        assert!(json["location"].is_null());
        assert_eq!(json["research_summary"], "");
        assert_eq!(json["preparation_questions"], "");
        assert_eq!(json["attendees"][0]["name"], "Jane Doe");
        assert_eq!(json["attendees"][0]["company"], "Initech");
        assert!(json["attendees"][0]["title"].is_null());
        assert_eq!(json["attendees"][0]["found_info"], true);
    }

    #[test]
    fn test_attendee_without_display_name() {
        let research = AttendeeResearch {
            attendee: Attendee::new("bob.smith@initech.com", None),
            research_summary: "No public profile".to_string(),
            found_info: false,
        };

        let json = serde_json::to_value(AttendeeBriefing::from(&research)).unwrap();
        assert!(json["name"].is_null());
        assert_eq!(json["email"], "bob.smith@initech.com");
        assert_eq!(json["found_info"], false);
    }
}
