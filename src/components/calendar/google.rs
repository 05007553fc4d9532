use super::models::{CalendarRecord, DateRange, RawEvent};
use super::CalendarService;
use crate::components::google_auth::GoogleApi;
use crate::error::{google_calendar_error, SummaryResult};
use crate::utils::time::local_midnight;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListPage {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListEntry {
    id: String,
    summary: Option<String>,
    summary_override: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    summary: Option<String>,
    start: EventTime,
    end: EventTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl EventTime {
    /// Instant of this boundary and whether it is a whole-day boundary
    fn resolve(&self, tz: &Tz) -> SummaryResult<(DateTime<Utc>, bool)> {
        if let Some(date_time) = &self.date_time {
            let dt = DateTime::parse_from_rfc3339(date_time)
                .map_err(|e| google_calendar_error(&format!("Failed to parse datetime: {}", e)))?;
            Ok((dt.with_timezone(&Utc), false))
        } else if let Some(date) = &self.date {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| google_calendar_error(&format!("Failed to parse date: {}", e)))?;
            Ok((local_midnight(tz, date), true))
        } else {
            Err(google_calendar_error("Event time has neither dateTime nor date"))
        }
    }
}

/// Calendar v3 binding
pub struct GoogleCalendarClient {
    api: GoogleApi,
    timezone: Tz,
}

impl GoogleCalendarClient {
    pub fn new(api: GoogleApi, timezone: Tz) -> Self {
        Self { api, timezone }
    }

    fn convert(&self, event: GoogleEvent) -> SummaryResult<RawEvent> {
        let (start, all_day) = event.start.resolve(&self.timezone)?;
        let (end, _) = event.end.resolve(&self.timezone)?;
        Ok(RawEvent {
            title: event.summary.unwrap_or_default(),
            start,
            end,
            all_day,
        })
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn list_calendars(&self) -> SummaryResult<Vec<CalendarRecord>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = GoogleApi::endpoint(
                CALENDAR_API,
                &["users", "me", "calendarList"],
                google_calendar_error,
            )?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page: CalendarListPage = self
                .api
                .json(Method::GET, url, None, google_calendar_error)
                .await?;

            calendars.extend(page.items.into_iter().map(|entry| {
                let name = entry.summary_override.or(entry.summary).unwrap_or_default();
                CalendarRecord::new(entry.id, name)
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Fetched {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn list_events(&self, calendar_id: &str, window: &DateRange) -> SummaryResult<Vec<RawEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = GoogleApi::endpoint(
                CALENDAR_API,
                &["calendars", calendar_id, "events"],
                google_calendar_error,
            )?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("timeMin", &window.start().to_rfc3339())
                    .append_pair("timeMax", &window.end().to_rfc3339())
                    .append_pair("singleEvents", "true")
                    .append_pair("orderBy", "startTime")
                    .append_pair("maxResults", "2500");
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: EventsPage = self
                .api
                .json(Method::GET, url, None, google_calendar_error)
                .await?;

            for event in page.items {
                events.push(self.convert(event)?);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Fetched {} events from calendar {}", events.len(), calendar_id);
        Ok(events)
    }
}
