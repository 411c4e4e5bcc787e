//! In-memory calendar and researcher doubles for unit tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::calendar::{
    Attendee, AttendeeResearch, CalendarError, CalendarSource, DayEvents, Meeting,
};
use crate::research::Researcher;

/// Keyword search is answered from a fixed table; every query is recorded.
#[derive(Default)]
pub struct FakeCalendar {
    pub by_keyword: HashMap<String, Vec<Meeting>>,
    pub failing_keywords: HashSet<String>,
    pub next: Option<Meeting>,
    pub day: Vec<Meeting>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeCalendar {
    pub fn with(mut self, keyword: &str, meetings: Vec<Meeting>) -> Self {
        self.by_keyword.insert(keyword.to_string(), meetings);
        self
    }

    pub fn failing(mut self, keyword: &str) -> Self {
        self.failing_keywords.insert(keyword.to_string());
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }
}

#[async_trait]
impl CalendarSource for FakeCalendar {
    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<Meeting>, CalendarError> {
        self.queries
            .lock()
            .unwrap()
            .push((keyword.to_string(), max_results));
        if self.failing_keywords.contains(keyword) {
            return Err(CalendarError::ApiError(format!("search for {keyword} failed")));
        }
        let mut found = self.by_keyword.get(keyword).cloned().unwrap_or_default();
        found.truncate(max_results);
        Ok(found)
    }

    async fn meeting_by_id(&self, id: &str) -> Result<Option<Meeting>, CalendarError> {
        Ok(self
            .by_keyword
            .values()
            .flatten()
            .chain(self.next.iter())
            .find(|m| m.id == id)
            .cloned())
    }

    async fn next_meeting(&self) -> Result<Option<Meeting>, CalendarError> {
        Ok(self.next.clone())
    }

    async fn events_for_day(&self, date: NaiveDate) -> Result<DayEvents, CalendarError> {
        Ok(DayEvents::new(date, self.day.clone()))
    }
}

/// Deterministic research: one result per non-self attendee.
#[derive(Default)]
pub struct FakeResearcher {
    pub fail_research: bool,
    pub fail_summary: bool,
    pub fail_questions: bool,
}

#[async_trait]
impl Researcher for FakeResearcher {
    async fn research_attendees(&self, meeting: &Meeting) -> Result<Vec<AttendeeResearch>> {
        if self.fail_research {
            return Err(anyhow!("research backend down"));
        }
        Ok(meeting
            .attendees
            .iter()
            .filter(|a| !a.is_self)
            .map(|a| AttendeeResearch {
                attendee: a.clone(),
                research_summary: format!("{} works at {}", a.name(), a.company.clone().unwrap_or_default()),
                found_info: a.company.is_some(),
            })
            .collect())
    }

    async fn meeting_summary(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String> {
        if self.fail_summary {
            return Err(anyhow!("summary model failed"));
        }
        Ok(format!("{} with {} people", meeting.title, research.len()))
    }

    async fn preparation_questions(
        &self,
        meeting: &Meeting,
        _research: &[AttendeeResearch],
    ) -> Result<String> {
        if self.fail_questions {
            return Err(anyhow!("questions model failed"));
        }
        Ok(format!("1. What is the goal of {}?", meeting.title))
    }
}

pub fn meeting_at(id: &str, title: &str, start: &str) -> Meeting {
    let mut meeting = Meeting::new(id, title);
    meeting.start_time = DateTime::parse_from_rfc3339(start).ok();
    meeting.attendees = vec![
        Attendee::new("me@acme.io", Some("Me".to_string())).own(),
        Attendee::new("jane@initech.com", Some("Jane Doe".to_string())),
    ];
    meeting.person_names = vec!["Jane Doe".to_string()];
    meeting
}
