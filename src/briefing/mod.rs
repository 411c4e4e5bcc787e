//! Meeting briefings.
//!
//! [`CalendarResearchAgent`] ties a [`CalendarSource`] to a [`Researcher`]
//! and turns meetings into [`MeetingBriefing`] payloads. It is the single
//! shared handle the HTTP layer holds.

mod date_search;
mod payload;

pub use date_search::{date_renderings, dedup_by_title, on_date, FALLBACK_KEYWORDS};
pub use payload::{AttendeeBriefing, MeetingBriefing};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::calendar::{AttendeeResearch, CalendarSource, DayEvents, Meeting};
use crate::research::Researcher;

/// Results per query while resolving a date.
pub const DATE_SEARCH_LIMIT: usize = 10;
/// Results per generic keyword in the fallback scan.
pub const KEYWORD_SCAN_LIMIT: usize = 20;
/// Results for an explicit keyword search.
pub const KEYWORD_SEARCH_LIMIT: usize = 5;

pub const SUMMARY_ERROR: &str = "Error generating research summary";
pub const QUESTIONS_ERROR: &str = "Error generating preparation questions";

/// How summary and question failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Listing endpoints: log and substitute placeholder text.
    Lenient,
    /// Single-meeting endpoints: fail the request.
    Strict,
}

pub struct CalendarResearchAgent {
    calendar: Arc<dyn CalendarSource>,
    researcher: Arc<dyn Researcher>,
}

impl CalendarResearchAgent {
    pub fn new(calendar: Arc<dyn CalendarSource>, researcher: Arc<dyn Researcher>) -> Self {
        Self {
            calendar,
            researcher,
        }
    }

    pub async fn search_meetings_by_keyword(
        &self,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<Meeting>> {
        self.calendar
            .search(keyword, max_results)
            .await
            .with_context(|| format!("Failed to search meetings for '{}'", keyword))
    }

    pub async fn get_meeting_by_id(&self, id: &str) -> Result<Option<Meeting>> {
        self.calendar
            .meeting_by_id(id)
            .await
            .with_context(|| format!("Failed to fetch meeting {}", id))
    }

    pub async fn get_next_meeting_info(&self) -> Result<Option<Meeting>> {
        self.calendar
            .next_meeting()
            .await
            .context("Failed to fetch next meeting")
    }

    pub async fn get_events_for_day(&self, date: NaiveDate) -> Result<DayEvents> {
        self.calendar
            .events_for_day(date)
            .await
            .with_context(|| format!("Failed to list events for {}", date))
    }

    pub async fn research_meeting_attendees(
        &self,
        meeting: &Meeting,
    ) -> Result<Vec<AttendeeResearch>> {
        self.researcher.research_attendees(meeting).await
    }

    pub async fn generate_meeting_summary(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String> {
        self.researcher.meeting_summary(meeting, research).await
    }

    pub async fn generate_meeting_type_questions(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<String> {
        self.researcher.preparation_questions(meeting, research).await
    }

    /// Resolve a `YYYY-MM-DD` date into meetings.
    ///
    /// Tries the literal date, then alternative renderings, then a scan over
    /// [`FALLBACK_KEYWORDS`] filtered by start date. Each step runs only if
    /// the previous one found nothing. Errors in the final scan are logged
    /// and produce an empty result.
    pub async fn find_meetings_for_date(&self, date_str: &str) -> Result<Vec<Meeting>> {
        let target = parse_date(date_str)?;

        let mut meetings = self
            .search_meetings_by_keyword(date_str, DATE_SEARCH_LIMIT)
            .await?;

        if meetings.is_empty() {
            for rendering in date_renderings(target) {
                meetings = self
                    .search_meetings_by_keyword(&rendering, DATE_SEARCH_LIMIT)
                    .await?;
                if !meetings.is_empty() {
                    debug!("Found meetings for {} using '{}'", date_str, rendering);
                    break;
                }
            }
        }

        if meetings.is_empty() {
            meetings = match self.scan_by_keywords(target).await {
                Ok(found) => {
                    info!(
                        "Found {} meetings for {} after filtering",
                        found.len(),
                        date_str
                    );
                    found
                }
                Err(e) => {
                    warn!("Error in date filtering: {:#}", e);
                    Vec::new()
                }
            };
        }

        Ok(meetings)
    }

    async fn scan_by_keywords(&self, target: NaiveDate) -> Result<Vec<Meeting>> {
        let mut all = Vec::new();
        for keyword in FALLBACK_KEYWORDS {
            all.extend(
                self.search_meetings_by_keyword(keyword, KEYWORD_SCAN_LIMIT)
                    .await?,
            );
        }
        Ok(on_date(dedup_by_title(all), target))
    }

    /// Research attendees and build the briefing for one meeting.
    pub async fn brief_meeting(
        &self,
        meeting: &Meeting,
        mode: AnalysisMode,
    ) -> Result<MeetingBriefing> {
        let research = self.research_meeting_attendees(meeting).await?;
        let mut briefing = MeetingBriefing::new(meeting, &research);

        match self.analyse(meeting, &research).await {
            Ok((summary, questions)) => {
                briefing.research_summary = summary;
                briefing.preparation_questions = questions;
            }
            Err(e) if mode == AnalysisMode::Lenient => {
                error!(
                    "Error generating summary for meeting {}: {:#}",
                    meeting.title, e
                );
                briefing.research_summary = SUMMARY_ERROR.to_string();
                briefing.preparation_questions = QUESTIONS_ERROR.to_string();
            }
            Err(e) => return Err(e),
        }

        Ok(briefing)
    }

    async fn analyse(
        &self,
        meeting: &Meeting,
        research: &[AttendeeResearch],
    ) -> Result<(String, String)> {
        let summary = self.generate_meeting_summary(meeting, research).await?;
        let questions = self
            .generate_meeting_type_questions(meeting, research)
            .await?;
        Ok((summary, questions))
    }

    async fn brief_all(&self, meetings: &[Meeting]) -> Result<Vec<MeetingBriefing>> {
        let mut briefings = Vec::with_capacity(meetings.len());
        for meeting in meetings {
            briefings.push(self.brief_meeting(meeting, AnalysisMode::Lenient).await?);
        }
        Ok(briefings)
    }

    pub async fn briefings_for_date(&self, date_str: &str) -> Result<Vec<MeetingBriefing>> {
        let meetings = self.find_meetings_for_date(date_str).await?;
        self.brief_all(&meetings).await
    }

    pub async fn meeting_details(&self, id: &str) -> Result<Option<MeetingBriefing>> {
        match self.get_meeting_by_id(id).await? {
            Some(meeting) => Ok(Some(
                self.brief_meeting(&meeting, AnalysisMode::Strict).await?,
            )),
            None => Ok(None),
        }
    }

    pub async fn next_meeting_briefing(&self) -> Result<Option<MeetingBriefing>> {
        match self.get_next_meeting_info().await? {
            Some(meeting) => Ok(Some(
                self.brief_meeting(&meeting, AnalysisMode::Strict).await?,
            )),
            None => Ok(None),
        }
    }

    pub async fn search_briefings(&self, keyword: &str) -> Result<Vec<MeetingBriefing>> {
        let meetings = self
            .search_meetings_by_keyword(keyword, KEYWORD_SEARCH_LIMIT)
            .await?;
        self.brief_all(&meetings).await
    }
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date_str))
}
