//! Google Calendar v3 client.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::error::CalendarError;
use super::types::{Attendee, DayEvents, Meeting};
use super::CalendarSource;
use crate::config::CalendarConfig;

/// Page size when scanning for the next meeting.
const NEXT_MEETING_SCAN: usize = 10;

/// Pages to walk before giving up on finding a timed upcoming meeting.
const NEXT_MEETING_MAX_PAGES: usize = 20;

/// Page size for a full-day listing.
const DAY_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
    #[serde(default)]
    attendees: Vec<ApiAttendee>,
    organizer: Option<ApiPerson>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAttendee {
    email: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    resource: bool,
    #[serde(default, rename = "self")]
    is_self: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPerson {
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// One page of a listing plus the token for the page after it.
struct EventPage {
    meetings: Vec<Meeting>,
    next_page_token: Option<String>,
}

/// Time-bounded event listing request.
struct EventQuery<'a> {
    keyword: Option<&'a str>,
    time_min: DateTime<FixedOffset>,
    time_max: Option<DateTime<FixedOffset>>,
    max_results: usize,
    page_token: Option<&'a str>,
}

pub struct GoogleCalendar {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    calendar_id: String,
    lookback: Duration,
    lookahead: Duration,
    offset: FixedOffset,
}

impl GoogleCalendar {
    pub fn new(config: &CalendarConfig) -> Result<Self, CalendarError> {
        let access_token = config
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or(CalendarError::AuthRequired)?;

        let offset: FixedOffset = config.utc_offset.parse().map_err(|_| {
            CalendarError::InvalidEventData(format!(
                "invalid utc_offset '{}', expected e.g. +02:00",
                config.utc_offset
            ))
        })?;

        info!(
            "Initialized Google Calendar client for calendar '{}'",
            config.calendar_id
        );

        Ok(Self {
            client: reqwest::Client::new(),
            access_token,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            lookback: Duration::days(config.lookback_days),
            lookahead: Duration::days(config.lookahead_days),
            offset,
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    async fn list_events(&self, query: EventQuery<'_>) -> Result<Vec<Meeting>, CalendarError> {
        Ok(self.fetch_page(query).await?.meetings)
    }

    async fn fetch_page(&self, query: EventQuery<'_>) -> Result<EventPage, CalendarError> {
        let mut params = vec![
            ("timeMin", query.time_min.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", query.max_results.to_string()),
        ];
        if let Some(time_max) = query.time_max {
            params.push(("timeMax", time_max.to_rfc3339()));
        }
        if let Some(keyword) = query.keyword {
            params.push(("q", keyword.to_string()));
        }
        if let Some(token) = query.page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response = self
            .client
            .get(self.events_url())
            .header("Authorization", self.auth_header())
            .query(&params)
            .send()
            .await?;

        let list: EventListResponse = handle_response(response).await?;
        let meetings: Vec<Meeting> = list
            .items
            .into_iter()
            .filter(|e| e.status.as_deref() != Some("cancelled"))
            .map(|e| meeting_from_api(e, self.offset))
            .collect();

        debug!("Calendar returned {} meetings", meetings.len());
        Ok(EventPage {
            meetings,
            next_page_token: list.next_page_token,
        })
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendar {
    #[instrument(skip(self), level = "info")]
    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<Meeting>, CalendarError> {
        let now = self.now();
        self.list_events(EventQuery {
            keyword: Some(keyword),
            time_min: now - self.lookback,
            time_max: Some(now + self.lookahead),
            max_results,
            page_token: None,
        })
        .await
    }

    #[instrument(skip(self), level = "info")]
    async fn meeting_by_id(&self, id: &str) -> Result<Option<Meeting>, CalendarError> {
        let url = format!("{}/{}", self.events_url(), urlencoding::encode(id));

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        // 410 is what Google returns for deleted events.
        if matches!(response.status().as_u16(), 404 | 410) {
            return Ok(None);
        }

        let event: ApiEvent = handle_response(response).await?;
        if event.status.as_deref() == Some("cancelled") {
            return Ok(None);
        }
        Ok(Some(meeting_from_api(event, self.offset)))
    }

    #[instrument(skip(self), level = "info")]
    async fn next_meeting(&self) -> Result<Option<Meeting>, CalendarError> {
        let now = self.now();
        let mut page_token: Option<String> = None;

        for page in 1..=NEXT_MEETING_MAX_PAGES {
            let upcoming = self
                .fetch_page(EventQuery {
                    keyword: None,
                    time_min: now,
                    time_max: Some(now + self.lookahead),
                    max_results: NEXT_MEETING_SCAN,
                    page_token: page_token.as_deref(),
                })
                .await?;

            // Listing includes events in progress; all-day entries are not meetings.
            if let Some(meeting) = upcoming
                .meetings
                .into_iter()
                .find(|m| m.start_time.is_some_and(|start| start >= now) && !is_all_day(m))
            {
                return Ok(Some(meeting));
            }

            match upcoming.next_page_token {
                Some(token) => {
                    debug!("No timed meeting on page {}, continuing", page);
                    page_token = Some(token);
                }
                None => return Ok(None),
            }
        }

        warn!(
            "No timed meeting within the first {} pages of upcoming events",
            NEXT_MEETING_MAX_PAGES
        );
        Ok(None)
    }

    #[instrument(skip(self), level = "info")]
    async fn events_for_day(&self, date: NaiveDate) -> Result<DayEvents, CalendarError> {
        let start = local_midnight(date, self.offset)
            .ok_or_else(|| CalendarError::InvalidEventData(format!("invalid date {date}")))?;

        let meetings = self
            .list_events(EventQuery {
                keyword: None,
                time_min: start,
                time_max: Some(start + Duration::days(1)),
                max_results: DAY_PAGE_SIZE,
                page_token: None,
            })
            .await?;

        Ok(DayEvents::new(date, meetings))
    }
}

fn is_all_day(meeting: &Meeting) -> bool {
    match (meeting.start_time, meeting.end_time) {
        (Some(start), Some(end)) => {
            start.num_seconds_from_midnight() == 0 && (end - start).num_hours() % 24 == 0
        }
        _ => false,
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CalendarError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
    } else if status.as_u16() == 401 {
        Err(CalendarError::TokenExpired)
    } else if status.as_u16() == 403 {
        Err(CalendarError::AuthRequired)
    } else if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        Err(CalendarError::RateLimited(retry_after))
    } else {
        let text = response.text().await.unwrap_or_default();
        Err(CalendarError::ApiError(format!("{}: {}", status, text)))
    }
}

fn meeting_from_api(api: ApiEvent, offset: FixedOffset) -> Meeting {
    let organizer_email = api.organizer.as_ref().and_then(|o| o.email.clone());

    let attendees: Vec<Attendee> = api
        .attendees
        .into_iter()
        .filter(|a| !a.resource)
        .filter_map(|a| {
            let attendee = Attendee::new(a.email?, a.display_name);
            Some(if a.is_self { attendee.own() } else { attendee })
        })
        .collect();

    let person_names = attendees
        .iter()
        .filter(|a| !a.is_self)
        .map(Attendee::name)
        .collect();

    Meeting {
        id: api.id,
        title: api.summary.unwrap_or_default(),
        start_time: api.start.as_ref().and_then(|t| parse_event_time(t, offset)),
        end_time: api.end.as_ref().and_then(|t| parse_event_time(t, offset)),
        location: api.location.filter(|l| !l.trim().is_empty()),
        description: api.description.unwrap_or_default(),
        attendees,
        organizer_name: api.organizer.and_then(|o| o.display_name),
        organizer_email,
        person_names,
    }
}

fn parse_event_time(api: &ApiEventTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Some(dt) = api
        .date_time
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    {
        return Some(dt);
    }
    // All-day events start at local midnight.
    api.date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .and_then(|d| local_midnight(d, offset))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    date.and_hms_opt(0, 0, 0)?
        .and_local_timezone(offset)
        .single()
}
