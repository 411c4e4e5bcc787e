//! Prompt construction and response parsing for attendee research and
//! meeting briefings.

use anyhow::Result;
use regex::Regex;

use super::MeetingType;
use crate::calendar::{Attendee, AttendeeResearch, Meeting};

pub const SYSTEM_PROMPT: &str = "You are a meticulous meeting-preparation assistant. \
You help the user walk into meetings knowing who they are meeting, why, and what to ask. \
Be concrete and concise, and never invent facts you are not confident about.";

/// Upper bound on description text copied into a prompt.
const MAX_DESCRIPTION_CHARS: usize = 2000;

const RESEARCH_REPLY_FORMAT: &str = "Reply with a single JSON object and nothing else:\n\
{\"found_info\": true|false, \"summary\": \"2-4 sentences about the person's role, \
background and likely interests in this meeting\", \"company\": \"employer or null\", \
\"title\": \"job title or null\"}\n\
Set found_info to false when you do not recognise the person; the summary should then \
say what can be inferred from the meeting context alone.\n";

pub fn attendee_research_prompt(meeting: &Meeting, attendee: &Attendee) -> String {
    let mut prompt = format!(
        "Research the following meeting attendee so the user can prepare.\n\n\
         Name: {}\nEmail: {}\n",
        attendee.name(),
        attendee.email
    );
    if let Some(company) = &attendee.company {
        prompt.push_str(&format!("Company (from email domain): {}\n", company));
    }
    if let Some(title) = &attendee.title {
        prompt.push_str(&format!("Title: {}\n", title));
    }
    prompt.push_str("\nMeeting context:\n");
    prompt.push_str(&meeting_facts(meeting));
    prompt.push('\n');
    prompt.push_str(RESEARCH_REPLY_FORMAT);
    prompt
}

pub fn meeting_summary_prompt(meeting: &Meeting, research: &[AttendeeResearch]) -> String {
    format!(
        "Write a short briefing for the meeting below: what it is about, who is attending \
         and what the user should know about them, and what a good outcome looks like.\n\n\
         {}\n{}",
        meeting_facts(meeting),
        research_notes(research)
    )
}

pub fn preparation_questions_prompt(
    meeting: &Meeting,
    research: &[AttendeeResearch],
    meeting_type: MeetingType,
) -> String {
    format!(
        "This looks like a {} meeting. Suggest 5 to 8 preparation questions the user \
         should think about or ask, focusing on {}.\n\
         Return them as a numbered list.\n\n\
         {}\n{}",
        meeting_type.as_str().replace('_', " "),
        meeting_type.focus(),
        meeting_facts(meeting),
        research_notes(research)
    )
}

fn meeting_facts(meeting: &Meeting) -> String {
    let mut facts = format!("Title: {}\n", meeting.title);
    if let Some(start) = meeting.start_time {
        facts.push_str(&format!("Starts: {}\n", start.to_rfc3339()));
    }
    if let Some(end) = meeting.end_time {
        facts.push_str(&format!("Ends: {}\n", end.to_rfc3339()));
    }
    if let Some(location) = &meeting.location {
        facts.push_str(&format!("Location: {}\n", location));
    }
    if let Some(organizer) = meeting.organizer() {
        facts.push_str(&format!("Organizer: {}\n", organizer));
    }
    if !meeting.person_names.is_empty() {
        facts.push_str(&format!("With: {}\n", meeting.person_names.join(", ")));
    }
    let description = meeting.description.trim();
    if !description.is_empty() {
        facts.push_str(&format!(
            "Description: {}\n",
            truncate_chars(description, MAX_DESCRIPTION_CHARS)
        ));
    }
    facts
}

fn research_notes(research: &[AttendeeResearch]) -> String {
    if research.is_empty() {
        return "No attendee research is available.\n".to_string();
    }

    let mut notes = String::from("Attendee research:\n");
    for result in research {
        let a = &result.attendee;
        let role = match (&a.title, &a.company) {
            (Some(title), Some(company)) => format!(", {} at {}", title, company),
            (Some(title), None) => format!(", {}", title),
            (None, Some(company)) => format!(", {}", company),
            (None, None) => String::new(),
        };
        let summary = if result.found_info {
            result.research_summary.as_str()
        } else {
            "(no public information found)"
        };
        notes.push_str(&format!("- {} <{}>{}: {}\n", a.name(), a.email, role, summary));
    }
    notes
}

/// Truncate to at most `max` characters, appending "..." when shortened.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Pulls a JSON object out of a model reply that may wrap it in a code
/// fence or surround it with prose.
pub struct JsonExtractor {
    fence_regex: Regex,
}

impl JsonExtractor {
    pub fn new() -> Result<Self> {
        let fence_regex = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```")?;
        Ok(Self { fence_regex })
    }

    pub fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        if let Some(captures) = self.fence_regex.captures(response) {
            return captures.get(1).map(|m| m.as_str());
        }

        let start = response.find('{')?;
        let end = response.rfind('}')?;
        (end > start).then(|| &response[start..=end])
    }
}
