//! Helpers for resolving a date into meetings through keyword search.
//!
//! The calendar search interface only matches text, so a date lookup tries
//! the ways a date tends to be written in event text, then falls back to
//! scanning generic meeting words and filtering by start date.

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use crate::calendar::Meeting;

/// Generic words that catch most meetings when no date text matches.
pub const FALLBACK_KEYWORDS: &[&str] = &[
    "meeting",
    "interview",
    "call",
    "appointment",
    "session",
    "discussion",
    "event",
];

/// Alternative renderings of `date`, in the order they are tried.
pub fn date_renderings(date: NaiveDate) -> Vec<String> {
    vec![
        date.format("%B %d, %Y").to_string(),
        date.format("%b %d, %Y").to_string(),
        date.format("%m/%d/%Y").to_string(),
        date.format("%m/%d").to_string(),
        date.day().to_string(),
        date.format("%Y-%m-%d").to_string(),
    ]
}

/// Keep the first meeting for each title.
pub fn dedup_by_title(meetings: Vec<Meeting>) -> Vec<Meeting> {
    let mut seen = HashSet::new();
    meetings
        .into_iter()
        .filter(|m| seen.insert(m.title.clone()))
        .collect()
}

/// Meetings whose start falls on `date`. Meetings without a start are dropped.
pub fn on_date(meetings: Vec<Meeting>, date: NaiveDate) -> Vec<Meeting> {
    meetings
        .into_iter()
        .filter(|m| m.start_date() == Some(date))
        .collect()
}
