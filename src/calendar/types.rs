//! Meeting and attendee types shared by the calendar, research and API layers.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Mail providers whose domain says nothing about the attendee's employer.
const PUBLIC_MAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "icloud.com",
    "me.com",
    "aol.com",
    "proton.me",
    "protonmail.com",
];

/// A calendar meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub location: Option<String>,
    pub description: String,
    pub attendees: Vec<Attendee>,
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
    /// Names of the people the meeting is with, excluding the calendar owner.
    pub person_names: Vec<String>,
}

impl Meeting {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time: None,
            end_time: None,
            location: None,
            description: String::new(),
            attendees: Vec::new(),
            organizer_name: None,
            organizer_email: None,
            person_names: Vec::new(),
        }
    }

    /// Calendar-local date of the meeting start.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_time.map(|t| t.date_naive())
    }

    pub fn attendee_display_names(&self) -> Vec<String> {
        self.attendees.iter().map(Attendee::name).collect()
    }

    /// Organizer name, falling back to the organizer e-mail.
    pub fn organizer(&self) -> Option<&str> {
        self.organizer_name
            .as_deref()
            .or(self.organizer_email.as_deref())
    }
}

/// A meeting participant as known to the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub display_name: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    /// The calendar owner's own entry.
    #[serde(default)]
    pub is_self: bool,
}

impl Attendee {
    pub fn new(email: impl Into<String>, display_name: Option<String>) -> Self {
        let email = email.into();
        let company = company_from_email(&email);
        Self {
            email,
            display_name,
            company,
            title: None,
            is_self: false,
        }
    }

    pub fn own(mut self) -> Self {
        self.is_self = true;
        self
    }

    /// Display name, or the local part of the e-mail when the calendar has none.
    pub fn name(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}

/// Research gathered about one attendee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeResearch {
    pub attendee: Attendee,
    pub research_summary: String,
    pub found_info: bool,
}

/// All meetings on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEvents {
    pub date: NaiveDate,
    pub meetings: Vec<Meeting>,
    pub total_events: usize,
}

impl DayEvents {
    pub fn new(date: NaiveDate, meetings: Vec<Meeting>) -> Self {
        Self {
            date,
            total_events: meetings.len(),
            meetings,
        }
    }
}

/// Guess an employer from a corporate e-mail domain ("jane@acme.io" -> "Acme").
pub fn company_from_email(email: &str) -> Option<String> {
    let domain = email.rsplit_once('@')?.1.trim().to_lowercase();
    if domain.is_empty() || PUBLIC_MAIL_DOMAINS.contains(&domain.as_str()) {
        return None;
    }

    let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
    // "mail.acme.co.uk" -> "acme": the label before the public suffix.
    let name = match labels.as_slice() {
        [] => return None,
        [only] => *only,
        [.., org, "co" | "com" | "ac" | "org", _cc] if labels.len() >= 3 => *org,
        [.., org, _tld] => *org,
    };

    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}
